// src/db/appointment_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::schedule::{Appointment, AppointmentStatus, PaymentMethod, ServiceSummary},
};

const APPOINTMENT_COLUMNS: &str = "id, client_id, barber_id, scheduled_at, status, \
     payment_method, total, comments, created_at, updated_at";

// Linha do join agendamento x serviço, usada na montagem das listagens.
#[derive(FromRow)]
struct AppointmentServiceRow {
    appointment_id: Uuid,
    service_id: Uuid,
    name: String,
    price: Decimal,
}

// Repositório dos agendamentos.
#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // O índice único parcial (barber_id, scheduled_at) devolve violação de
    // unicidade quando duas requisições concorrentes passam pela pré-checagem
    // de colisão; aqui ela vira o mesmo conflito que a pré-checagem reporta.
    fn map_slot_conflict(e: sqlx::Error) -> AppError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Conflict(
                    "O barbeiro não está disponível neste horário.".to_string(),
                );
            }
        }
        e.into()
    }

    /// Insere o agendamento e os vínculos com os serviços em uma transação.
    pub async fn create(
        &self,
        client_id: Uuid,
        barber_id: Uuid,
        scheduled_at: DateTime<Utc>,
        payment_method: PaymentMethod,
        total: Decimal,
        comments: Option<&str>,
        service_ids: &[Uuid],
    ) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await?;

        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "INSERT INTO appointments (client_id, barber_id, scheduled_at, payment_method, total, comments)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(client_id)
        .bind(barber_id)
        .bind(scheduled_at)
        .bind(payment_method)
        .bind(total)
        .bind(comments)
        .fetch_one(&mut *tx)
        .await
        .map_err(Self::map_slot_conflict)?;

        for service_id in service_ids {
            sqlx::query(
                "INSERT INTO appointment_services (appointment_id, service_id) VALUES ($1, $2)",
            )
            .bind(appointment.id)
            .bind(service_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(appointment)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Busca um agendamento ativo (não cancelado) no instante exato.
    /// `exclude` tira o próprio agendamento da checagem no reagendamento.
    pub async fn find_active_at(
        &self,
        barber_id: Uuid,
        scheduled_at: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<Option<Appointment>, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE barber_id = $1
               AND scheduled_at = $2
               AND status <> 'Cancelled'
               AND ($3::uuid IS NULL OR id <> $3)"
        ))
        .bind(barber_id)
        .bind(scheduled_at)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Conta agendamentos ativos com instante dentro de [from, to).
    pub async fn count_active_between(
        &self,
        barber_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM appointments
             WHERE barber_id = $1
               AND scheduled_at >= $2
               AND scheduled_at < $3
               AND status <> 'Cancelled'",
        )
        .bind(barber_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "UPDATE appointments
             SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(appointment)
    }

    // Reagendar sempre rebaixa o status para Pendente.
    pub async fn reschedule(
        &self,
        id: Uuid,
        new_scheduled_at: DateTime<Utc>,
    ) -> Result<Appointment, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "UPDATE appointments
             SET scheduled_at = $2, status = 'Pending', updated_at = now()
             WHERE id = $1
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(new_scheduled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_slot_conflict)?;

        Ok(appointment)
    }

    pub async fn list_by_barber(&self, barber_id: Uuid) -> Result<Vec<Appointment>, AppError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE barber_id = $1
             ORDER BY scheduled_at ASC"
        ))
        .bind(barber_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Appointment>, AppError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE client_id = $1
             ORDER BY scheduled_at ASC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    /// Resumos dos serviços de cada agendamento (join de leitura das listagens).
    pub async fn services_for(
        &self,
        appointment_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, ServiceSummary)>, AppError> {
        if appointment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, AppointmentServiceRow>(
            "SELECT aps.appointment_id, s.id AS service_id, s.name, s.price
             FROM appointment_services aps
             INNER JOIN services s ON s.id = aps.service_id
             WHERE aps.appointment_id = ANY($1)",
        )
        .bind(appointment_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.appointment_id,
                    ServiceSummary {
                        id: row.service_id,
                        name: row.name,
                        price: row.price,
                    },
                )
            })
            .collect())
    }
}
