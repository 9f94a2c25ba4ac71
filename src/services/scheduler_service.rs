// src/services/scheduler_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AppointmentRepository, CatalogRepository, UserRepository},
    models::{
        auth::UserRole,
        catalog::Service,
        schedule::{Appointment, AppointmentDetail, AppointmentStatus, PaymentMethod},
    },
};

// O orquestrador da agenda: cruza agendamentos existentes, catálogo e contas
// antes de cada escrita. Não há transação entre as leituras e a escrita; a
// barreira final contra corrida é o índice único parcial do banco.
#[derive(Clone)]
pub struct SchedulerService {
    appointment_repo: AppointmentRepository,
    catalog_repo: CatalogRepository,
    user_repo: UserRepository,
}

/// Soma os preços vigentes dos serviços escolhidos. O resultado é gravado no
/// agendamento e nunca recalculado (mudança de preço não retroage).
fn compute_total(services: &[Service]) -> Decimal {
    services.iter().map(|s| s.price).sum()
}

impl SchedulerService {
    pub fn new(
        appointment_repo: AppointmentRepository,
        catalog_repo: CatalogRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            appointment_repo,
            catalog_repo,
            user_repo,
        }
    }

    /// Cria um agendamento Pendente para o cliente.
    ///
    /// A única checagem de colisão é o instante exato contra outros
    /// agendamentos ativos do barbeiro: horários de trabalho e bloqueios NÃO
    /// são consultados aqui (comportamento assumido; o endpoint de consulta
    /// de disponibilidade existe para o cliente checar antes).
    pub async fn create(
        &self,
        client_id: Uuid,
        barber_id: Uuid,
        service_ids: &[Uuid],
        scheduled_at: DateTime<Utc>,
        payment_method: PaymentMethod,
        comments: Option<&str>,
    ) -> Result<Appointment, AppError> {
        // 1. O barbeiro existe?
        self.user_repo
            .find_by_id(UserRole::Barber, barber_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Barbeiro".to_string()))?;

        // 2. Todos os serviços referenciados existem?
        let services = self.catalog_repo.find_by_ids(service_ids).await?;
        if services.len() != service_ids.len() {
            return Err(AppError::InvalidInput(
                "Alguns serviços não são válidos.".to_string(),
            ));
        }

        // 3. O instante exato está livre na agenda do barbeiro?
        if self
            .appointment_repo
            .find_active_at(barber_id, scheduled_at, None)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "O barbeiro não está disponível neste horário.".to_string(),
            ));
        }

        // 4. Fotografa o total no momento da criação.
        let total = compute_total(&services);

        // 5. Persiste (o índice único segura a corrida entre 3 e aqui).
        self.appointment_repo
            .create(
                client_id,
                barber_id,
                scheduled_at,
                payment_method,
                total,
                comments,
                service_ids,
            )
            .await
    }

    /// Confirmação/cancelamento pelo barbeiro dono do agendamento.
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        requester_id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        let appointment = self.find_appointment(appointment_id).await?;

        if appointment.barber_id != requester_id {
            return Err(AppError::Forbidden(
                "Você não tem permissão para atualizar este agendamento.".to_string(),
            ));
        }

        // Só Confirmada e Cancelada são destinos válidos de uma atualização
        // direta; Pendente volta a existir apenas via reagendamento.
        if new_status == AppointmentStatus::Pending {
            return Err(AppError::InvalidInput(
                "Status de agendamento inválido.".to_string(),
            ));
        }

        if !appointment.status.allows_transition_to(new_status) {
            return Err(AppError::Conflict(
                "Não é possível alterar um agendamento cancelado.".to_string(),
            ));
        }

        self.appointment_repo.update_status(appointment_id, new_status).await
    }

    /// Cancelamento pelo cliente ou pelo barbeiro do agendamento.
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Appointment, AppError> {
        let appointment = self.find_appointment(appointment_id).await?;

        if appointment.client_id != requester_id && appointment.barber_id != requester_id {
            return Err(AppError::Forbidden(
                "Você não tem permissão para cancelar este agendamento.".to_string(),
            ));
        }

        // Cancelar é terminal: repetir o cancelamento é conflito, nunca
        // sucesso silencioso.
        if appointment.status.is_cancelled() {
            return Err(AppError::Conflict(
                "O agendamento já está cancelado.".to_string(),
            ));
        }

        self.appointment_repo
            .update_status(appointment_id, AppointmentStatus::Cancelled)
            .await
    }

    /// Move o agendamento para um novo instante, refazendo a checagem de
    /// colisão (excluindo o próprio agendamento) e rebaixando o status para
    /// Pendente: reagendar sempre exige nova confirmação.
    pub async fn reschedule(
        &self,
        appointment_id: Uuid,
        requester_id: Uuid,
        new_scheduled_at: DateTime<Utc>,
    ) -> Result<Appointment, AppError> {
        let appointment = self.find_appointment(appointment_id).await?;

        if appointment.client_id != requester_id && appointment.barber_id != requester_id {
            return Err(AppError::Forbidden(
                "Você não tem permissão para reagendar este agendamento.".to_string(),
            ));
        }

        // Cancelado é terminal: reagendar não ressuscita o agendamento.
        if appointment.status.is_cancelled() {
            return Err(AppError::Conflict(
                "Não é possível reagendar um agendamento cancelado.".to_string(),
            ));
        }

        if self
            .appointment_repo
            .find_active_at(appointment.barber_id, new_scheduled_at, Some(appointment_id))
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "O barbeiro não está disponível no novo horário.".to_string(),
            ));
        }

        self.appointment_repo
            .reschedule(appointment_id, new_scheduled_at)
            .await
    }

    pub async fn list_for_barber(&self, barber_id: Uuid) -> Result<Vec<AppointmentDetail>, AppError> {
        let appointments = self.appointment_repo.list_by_barber(barber_id).await?;
        self.assemble_details(appointments, UserRole::Client).await
    }

    pub async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<AppointmentDetail>, AppError> {
        let appointments = self.appointment_repo.list_by_client(client_id).await?;
        self.assemble_details(appointments, UserRole::Barber).await
    }

    pub async fn find_active_at(
        &self,
        barber_id: Uuid,
        instant: DateTime<Utc>,
    ) -> Result<Option<Appointment>, AppError> {
        self.appointment_repo.find_active_at(barber_id, instant, None).await
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Appointment, AppError> {
        self.appointment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Agendamento".to_string()))
    }

    // Join de leitura: resolve os nomes da contraparte e os serviços de cada
    // agendamento para exibição, sem desnormalizar nada na escrita.
    async fn assemble_details(
        &self,
        appointments: Vec<Appointment>,
        counterpart: UserRole,
    ) -> Result<Vec<AppointmentDetail>, AppError> {
        let appointment_ids: Vec<Uuid> = appointments.iter().map(|a| a.id).collect();

        let counterpart_ids: Vec<Uuid> = appointments
            .iter()
            .map(|a| match counterpart {
                UserRole::Barber => a.barber_id,
                UserRole::Client => a.client_id,
            })
            .collect();

        let names: HashMap<Uuid, String> = self
            .user_repo
            .find_names(counterpart, &counterpart_ids)
            .await?
            .into_iter()
            .collect();

        let mut services_by_appointment: HashMap<Uuid, Vec<_>> = HashMap::new();
        for (appointment_id, summary) in self.appointment_repo.services_for(&appointment_ids).await? {
            services_by_appointment.entry(appointment_id).or_default().push(summary);
        }

        Ok(appointments
            .into_iter()
            .map(|a| {
                let (barber_name, client_name) = match counterpart {
                    UserRole::Barber => (names.get(&a.barber_id).cloned(), None),
                    UserRole::Client => (None, names.get(&a.client_id).cloned()),
                };
                let services = services_by_appointment.remove(&a.id).unwrap_or_default();
                AppointmentDetail {
                    header: a,
                    client_name,
                    barber_name,
                    services,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn service(price: f64) -> Service {
        let now = Utc::now();
        Service {
            id: Uuid::new_v4(),
            barber_id: Uuid::new_v4(),
            name: "Corte".to_string(),
            description: String::new(),
            price: Decimal::from_f64(price).unwrap(),
            duration_minutes: 30,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn total_is_the_sum_of_service_prices() {
        let services = vec![service(45.0), service(25.5), service(10.0)];
        assert_eq!(compute_total(&services), Decimal::from_f64(80.5).unwrap());
    }

    #[test]
    fn total_is_zero_without_services() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_snapshot_ignores_later_price_change() {
        let mut services = vec![service(45.0)];
        let total = compute_total(&services);

        // O preço do catálogo muda depois; o total já fotografado não.
        services[0].price = Decimal::from_f64(90.0).unwrap();
        assert_eq!(total, Decimal::from_f64(45.0).unwrap());
        assert_ne!(total, compute_total(&services));
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::prelude::FromPrimitive;
    use sqlx::PgPool;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, h, m, 0).unwrap()
    }

    // Semeia um barbeiro, um cliente e um serviço e monta o orquestrador.
    async fn seed(pool: &PgPool) -> (SchedulerService, Uuid, Uuid, Vec<Uuid>) {
        let user_repo = UserRepository::new(pool.clone());
        let catalog_repo = CatalogRepository::new(pool.clone());
        let appointment_repo = AppointmentRepository::new(pool.clone());

        let barber = user_repo
            .create(UserRole::Barber, "Carlos", "carlos@example.com", "hash", None)
            .await
            .unwrap();
        let client = user_repo
            .create(UserRole::Client, "Ana", "ana@example.com", "hash", None)
            .await
            .unwrap();
        let service = catalog_repo
            .create(barber.id, "Corte", "", Decimal::from_f64(45.0).unwrap(), 30)
            .await
            .unwrap();

        let scheduler = SchedulerService::new(appointment_repo, catalog_repo, user_repo);
        (scheduler, barber.id, client.id, vec![service.id])
    }

    #[sqlx::test]
    async fn second_booking_at_same_instant_is_rejected(pool: PgPool) {
        let (scheduler, barber_id, client_id, service_ids) = seed(&pool).await;

        scheduler
            .create(client_id, barber_id, &service_ids, at(14, 0), PaymentMethod::Card, None)
            .await
            .unwrap();

        // Mesmo barbeiro e instante, ainda que os serviços sejam outros.
        let err = scheduler
            .create(client_id, barber_id, &[], at(14, 0), PaymentMethod::Cash, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[sqlx::test]
    async fn cancelling_frees_the_slot(pool: PgPool) {
        let (scheduler, barber_id, client_id, service_ids) = seed(&pool).await;

        let first = scheduler
            .create(client_id, barber_id, &service_ids, at(14, 0), PaymentMethod::Card, None)
            .await
            .unwrap();
        scheduler.cancel(first.id, client_id).await.unwrap();

        // O índice parcial ignora linhas canceladas, então o instante volta a
        // estar livre.
        scheduler
            .create(client_id, barber_id, &service_ids, at(14, 0), PaymentMethod::Card, None)
            .await
            .unwrap();
    }

    #[sqlx::test]
    async fn reschedule_demotes_confirmed_to_pending(pool: PgPool) {
        let (scheduler, barber_id, client_id, service_ids) = seed(&pool).await;

        let appointment = scheduler
            .create(client_id, barber_id, &service_ids, at(14, 0), PaymentMethod::Card, None)
            .await
            .unwrap();
        let confirmed = scheduler
            .update_status(appointment.id, barber_id, AppointmentStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

        let moved = scheduler
            .reschedule(appointment.id, client_id, at(15, 0))
            .await
            .unwrap();
        assert_eq!(moved.status, AppointmentStatus::Pending);
        assert_eq!(moved.scheduled_at, at(15, 0));
    }

    #[sqlx::test]
    async fn cancelled_appointment_cannot_be_rescheduled(pool: PgPool) {
        let (scheduler, barber_id, client_id, service_ids) = seed(&pool).await;

        let appointment = scheduler
            .create(client_id, barber_id, &service_ids, at(14, 0), PaymentMethod::Card, None)
            .await
            .unwrap();
        scheduler.cancel(appointment.id, client_id).await.unwrap();

        // Cancelado é terminal também para o reagendamento.
        let err = scheduler
            .reschedule(appointment.id, client_id, at(15, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // E o agendamento segue cancelado, sem voltar a ocupar a agenda.
        let slot = scheduler.find_active_at(barber_id, at(15, 0)).await.unwrap();
        assert!(slot.is_none());
    }
}
