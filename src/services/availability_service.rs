// src/services/availability_service.rs

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AvailabilityRepository,
    models::schedule::{minutes_since_midnight, overlap_half_open, WorkingHours},
};

#[derive(Clone)]
pub struct AvailabilityService {
    repo: AvailabilityRepository,
}

/// Compara a janela candidata com as existentes em minutos desde a
/// meia-noite, usando o predicado semiaberto compartilhado.
fn overlaps_existing(
    existing: &[WorkingHours],
    start: NaiveTime,
    end: NaiveTime,
    exclude: Option<Uuid>,
) -> bool {
    let start_m = minutes_since_midnight(start);
    let end_m = minutes_since_midnight(end);

    existing
        .iter()
        .filter(|w| Some(w.id) != exclude)
        .any(|w| {
            overlap_half_open(
                minutes_since_midnight(w.start_time),
                minutes_since_midnight(w.end_time),
                start_m,
                end_m,
            )
        })
}

/// O instante cai dentro da janela recorrente? O dia da semana segue a
/// convenção 0 = Domingo.
fn window_contains_instant(
    day_of_week: i16,
    start: NaiveTime,
    end: NaiveTime,
    at: DateTime<Utc>,
) -> bool {
    if at.weekday().num_days_from_sunday() as i16 != day_of_week {
        return false;
    }
    let m = minutes_since_midnight(at.time());
    m >= minutes_since_midnight(start) && m < minutes_since_midnight(end)
}

impl AvailabilityService {
    pub fn new(repo: AvailabilityRepository) -> Self {
        Self { repo }
    }

    fn validate_bounds(start: NaiveTime, end: NaiveTime) -> Result<(), AppError> {
        if end <= start {
            return Err(AppError::InvalidInput(
                "A hora final deve ser posterior à hora inicial.".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create(
        &self,
        barber_id: Uuid,
        day_of_week: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<WorkingHours, AppError> {
        Self::validate_bounds(start_time, end_time)?;

        let existing = self.repo.list_by_barber_and_day(barber_id, day_of_week).await?;
        if overlaps_existing(&existing, start_time, end_time, None) {
            return Err(AppError::Conflict(
                "Este horário se sobrepõe a um horário de trabalho existente.".to_string(),
            ));
        }

        self.repo.create(barber_id, day_of_week, start_time, end_time).await
    }

    pub async fn list(&self, barber_id: Uuid) -> Result<Vec<WorkingHours>, AppError> {
        self.repo.list_by_barber(barber_id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        requester_id: Uuid,
        day_of_week: Option<i16>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> Result<WorkingHours, AppError> {
        let window = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Horário".to_string()))?;

        if window.barber_id != requester_id {
            return Err(AppError::Forbidden(
                "Você não tem permissão para alterar este horário.".to_string(),
            ));
        }

        // Merge explícito e revalidação do resultado contra as OUTRAS janelas
        // do mesmo barbeiro e dia.
        let day_of_week = day_of_week.unwrap_or(window.day_of_week);
        let start_time = start_time.unwrap_or(window.start_time);
        let end_time = end_time.unwrap_or(window.end_time);

        Self::validate_bounds(start_time, end_time)?;

        let existing = self.repo.list_by_barber_and_day(window.barber_id, day_of_week).await?;
        if overlaps_existing(&existing, start_time, end_time, Some(id)) {
            return Err(AppError::Conflict(
                "Este horário se sobrepõe a um horário de trabalho existente.".to_string(),
            ));
        }

        self.repo.update(id, day_of_week, start_time, end_time).await
    }

    pub async fn delete(&self, id: Uuid, requester_id: Uuid) -> Result<(), AppError> {
        let window = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Horário".to_string()))?;

        if window.barber_id != requester_id {
            return Err(AppError::Forbidden(
                "Você não tem permissão para excluir este horário.".to_string(),
            ));
        }

        // Proteção branda: não deixa apagar a janela que contém o momento atual.
        if window_contains_instant(window.day_of_week, window.start_time, window.end_time, Utc::now()) {
            return Err(AppError::Conflict(
                "Não é possível excluir um horário de trabalho ativo neste momento.".to_string(),
            ));
        }

        self.repo.delete(id).await
    }

    /// O instante cai dentro de alguma janela de trabalho do barbeiro?
    /// Consultivo: a criação de agendamento NÃO passa por aqui.
    pub async fn is_within_availability(
        &self,
        barber_id: Uuid,
        instant: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let windows = self.repo.list_by_barber(barber_id).await?;
        Ok(windows
            .iter()
            .any(|w| window_contains_instant(w.day_of_week, w.start_time, w.end_time, instant)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn window(day: i16, start: NaiveTime, end: NaiveTime) -> WorkingHours {
        let now = Utc::now();
        WorkingHours {
            id: Uuid::new_v4(),
            barber_id: Uuid::new_v4(),
            day_of_week: day,
            start_time: start,
            end_time: end,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn rejects_overlapping_window_same_day() {
        // [09:00, 12:00) já existe; [11:00, 15:00) colide.
        let existing = vec![window(1, hm(9, 0), hm(12, 0))];
        assert!(overlaps_existing(&existing, hm(11, 0), hm(15, 0), None));
    }

    #[test]
    fn accepts_touching_window() {
        let existing = vec![window(1, hm(9, 0), hm(12, 0))];
        assert!(!overlaps_existing(&existing, hm(12, 0), hm(15, 0), None));
    }

    #[test]
    fn update_ignores_own_row() {
        let w = window(1, hm(9, 0), hm(12, 0));
        let id = w.id;
        let existing = vec![w];
        // Encolher a própria janela não conflita com ela mesma.
        assert!(!overlaps_existing(&existing, hm(9, 0), hm(11, 0), Some(id)));
        assert!(overlaps_existing(&existing, hm(9, 0), hm(11, 0), None));
    }

    #[test]
    fn instant_inside_window_on_matching_weekday() {
        // 2026-03-09 é uma segunda-feira (dia 1).
        let monday_morning = Utc.with_ymd_and_hms(2026, 3, 9, 10, 30, 0).unwrap();
        assert!(window_contains_instant(1, hm(9, 0), hm(12, 0), monday_morning));
        // Mesmo horário, dia errado.
        assert!(!window_contains_instant(2, hm(9, 0), hm(12, 0), monday_morning));
        // Dia certo, fora da janela (limite superior é exclusivo).
        let monday_noon = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        assert!(!window_contains_instant(1, hm(9, 0), hm(12, 0), monday_noon));
    }
}
