// src/services/blocked_time_service.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AppointmentRepository, BlockedTimeRepository},
    models::schedule::{BlockedKind, BlockedWindow, TimeWindow},
};

#[derive(Clone)]
pub struct BlockedTimeService {
    repo: BlockedTimeRepository,
    appointment_repo: AppointmentRepository,
}

/// A janela candidata colide com algum bloqueio existente?
/// `exclude` tira o próprio bloqueio da checagem numa atualização.
fn overlaps_existing(existing: &[BlockedWindow], candidate: &TimeWindow, exclude: Option<Uuid>) -> bool {
    existing
        .iter()
        .filter(|b| Some(b.id) != exclude)
        .any(|b| b.window().overlaps(candidate))
}

impl BlockedTimeService {
    pub fn new(repo: BlockedTimeRepository, appointment_repo: AppointmentRepository) -> Self {
        Self { repo, appointment_repo }
    }

    /// Bloqueio só entra se não colidir com outro bloqueio nem cobrir um
    /// agendamento ativo.
    async fn ensure_window_free(
        &self,
        barber_id: Uuid,
        window: &TimeWindow,
        exclude: Option<Uuid>,
    ) -> Result<(), AppError> {
        let blocks = self.repo.list_by_barber(barber_id).await?;
        if overlaps_existing(&blocks, window, exclude) {
            return Err(AppError::Conflict(
                "Você já possui um bloqueio neste intervalo.".to_string(),
            ));
        }

        let appointments = self
            .appointment_repo
            .count_active_between(barber_id, window.start, window.end)
            .await?;
        if appointments > 0 {
            return Err(AppError::Conflict(
                "Não é possível bloquear este intervalo: há agendamentos marcados.".to_string(),
            ));
        }

        Ok(())
    }

    pub async fn create(
        &self,
        barber_id: Uuid,
        kind: BlockedKind,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        description: &str,
    ) -> Result<BlockedWindow, AppError> {
        let window = TimeWindow::new(starts_at, ends_at)?;
        self.ensure_window_free(barber_id, &window, None).await?;

        self.repo
            .create(barber_id, kind, starts_at, ends_at, description)
            .await
    }

    pub async fn list(&self, barber_id: Uuid) -> Result<Vec<BlockedWindow>, AppError> {
        self.repo.list_by_barber(barber_id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        requester_id: Uuid,
        kind: Option<BlockedKind>,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
        description: Option<&str>,
    ) -> Result<BlockedWindow, AppError> {
        let blocked = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Bloqueio de horário".to_string()))?;

        if blocked.barber_id != requester_id {
            return Err(AppError::Forbidden(
                "Você não tem permissão para alterar este bloqueio.".to_string(),
            ));
        }

        // Merge explícito e revalidação da janela resultante.
        let kind = kind.unwrap_or(blocked.kind);
        let starts_at = starts_at.unwrap_or(blocked.starts_at);
        let ends_at = ends_at.unwrap_or(blocked.ends_at);
        let description = description.unwrap_or(&blocked.description);

        let window = TimeWindow::new(starts_at, ends_at)?;
        self.ensure_window_free(requester_id, &window, Some(id)).await?;

        self.repo
            .update(id, kind, starts_at, ends_at, description)
            .await
    }

    pub async fn delete(&self, id: Uuid, requester_id: Uuid) -> Result<(), AppError> {
        let blocked = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Bloqueio de horário".to_string()))?;

        if blocked.barber_id != requester_id {
            return Err(AppError::Forbidden(
                "Você não tem permissão para excluir este bloqueio.".to_string(),
            ));
        }

        // Bloqueio que cobre agendamentos ativos não pode ser removido.
        let appointments = self
            .appointment_repo
            .count_active_between(requester_id, blocked.starts_at, blocked.ends_at)
            .await?;
        if appointments > 0 {
            return Err(AppError::Conflict(
                "Não é possível excluir este bloqueio: há agendamentos marcados no intervalo.".to_string(),
            ));
        }

        self.repo.delete(id).await
    }

    /// O instante cai dentro de algum bloqueio do barbeiro?
    pub async fn is_blocked(&self, barber_id: Uuid, instant: DateTime<Utc>) -> Result<bool, AppError> {
        let blocks = self.repo.list_by_barber(barber_id).await?;
        Ok(blocks.iter().any(|b| b.window().contains(instant)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, h, m, 0).unwrap()
    }

    fn blocked(starts: DateTime<Utc>, ends: DateTime<Utc>) -> BlockedWindow {
        let now = Utc::now();
        BlockedWindow {
            id: Uuid::new_v4(),
            barber_id: Uuid::new_v4(),
            kind: BlockedKind::Other,
            starts_at: starts,
            ends_at: ends,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn detects_collision_with_existing_block() {
        let existing = vec![blocked(at(12, 0), at(13, 0))];
        let candidate = TimeWindow::new(at(12, 30), at(14, 0)).unwrap();
        assert!(overlaps_existing(&existing, &candidate, None));
    }

    #[test]
    fn touching_blocks_are_allowed() {
        let existing = vec![blocked(at(12, 0), at(13, 0))];
        let candidate = TimeWindow::new(at(13, 0), at(14, 0)).unwrap();
        assert!(!overlaps_existing(&existing, &candidate, None));
    }

    #[test]
    fn update_skips_the_block_being_edited() {
        let b = blocked(at(12, 0), at(13, 0));
        let id = b.id;
        let existing = vec![b];
        let candidate = TimeWindow::new(at(12, 0), at(13, 30)).unwrap();
        assert!(!overlaps_existing(&existing, &candidate, Some(id)));
        assert!(overlaps_existing(&existing, &candidate, None));
    }

    #[test]
    fn instant_inside_block_is_blocked() {
        let b = blocked(at(12, 0), at(13, 0));
        assert!(b.window().contains(at(12, 0)));
        assert!(b.window().contains(at(12, 59)));
        // Limite superior exclusivo.
        assert!(!b.window().contains(at(13, 0)));
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    use crate::{
        db::UserRepository,
        models::{
            auth::UserRole,
            schedule::{AppointmentStatus, PaymentMethod},
        },
    };

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, h, m, 0).unwrap()
    }

    #[sqlx::test]
    async fn rejects_block_over_scheduled_appointment(pool: PgPool) {
        let user_repo = UserRepository::new(pool.clone());
        let appointment_repo = AppointmentRepository::new(pool.clone());

        let barber = user_repo
            .create(UserRole::Barber, "Carlos", "carlos@example.com", "hash", None)
            .await
            .unwrap();
        let client = user_repo
            .create(UserRole::Client, "Ana", "ana@example.com", "hash", None)
            .await
            .unwrap();

        // Agendamento confirmado às 14:00.
        let appointment = appointment_repo
            .create(client.id, barber.id, at(14, 0), PaymentMethod::Cash, Decimal::ZERO, None, &[])
            .await
            .unwrap();
        appointment_repo
            .update_status(appointment.id, AppointmentStatus::Confirmed)
            .await
            .unwrap();

        let service = BlockedTimeService::new(
            BlockedTimeRepository::new(pool.clone()),
            appointment_repo,
        );

        // [13:30, 14:30) cobre o agendamento; o bloqueio não entra.
        let err = service
            .create(barber.id, BlockedKind::Break, at(13, 30), at(14, 30), "")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Fora do intervalo do agendamento, o bloqueio entra normalmente.
        service
            .create(barber.id, BlockedKind::Break, at(15, 0), at(16, 0), "")
            .await
            .unwrap();
    }
}
