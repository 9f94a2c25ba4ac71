// src/db/availability_repo.rs

use chrono::NaiveTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::schedule::WorkingHours};

const WORKING_HOURS_COLUMNS: &str =
    "id, barber_id, day_of_week, start_time, end_time, created_at, updated_at";

// Repositório das janelas semanais recorrentes de trabalho.
#[derive(Clone)]
pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        barber_id: Uuid,
        day_of_week: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<WorkingHours, AppError> {
        let window = sqlx::query_as::<_, WorkingHours>(&format!(
            "INSERT INTO working_hours (barber_id, day_of_week, start_time, end_time)
             VALUES ($1, $2, $3, $4)
             RETURNING {WORKING_HOURS_COLUMNS}"
        ))
        .bind(barber_id)
        .bind(day_of_week)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(window)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkingHours>, AppError> {
        let window = sqlx::query_as::<_, WorkingHours>(&format!(
            "SELECT {WORKING_HOURS_COLUMNS} FROM working_hours WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(window)
    }

    /// Todas as janelas do barbeiro, ordenadas por (dia, início).
    pub async fn list_by_barber(&self, barber_id: Uuid) -> Result<Vec<WorkingHours>, AppError> {
        let windows = sqlx::query_as::<_, WorkingHours>(&format!(
            "SELECT {WORKING_HOURS_COLUMNS} FROM working_hours
             WHERE barber_id = $1
             ORDER BY day_of_week ASC, start_time ASC"
        ))
        .bind(barber_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(windows)
    }

    /// Candidatas à checagem de sobreposição: as janelas do mesmo barbeiro e dia.
    pub async fn list_by_barber_and_day(
        &self,
        barber_id: Uuid,
        day_of_week: i16,
    ) -> Result<Vec<WorkingHours>, AppError> {
        let windows = sqlx::query_as::<_, WorkingHours>(&format!(
            "SELECT {WORKING_HOURS_COLUMNS} FROM working_hours
             WHERE barber_id = $1 AND day_of_week = $2
             ORDER BY start_time ASC"
        ))
        .bind(barber_id)
        .bind(day_of_week)
        .fetch_all(&self.pool)
        .await?;

        Ok(windows)
    }

    pub async fn update(
        &self,
        id: Uuid,
        day_of_week: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<WorkingHours, AppError> {
        let window = sqlx::query_as::<_, WorkingHours>(&format!(
            "UPDATE working_hours
             SET day_of_week = $2, start_time = $3, end_time = $4, updated_at = now()
             WHERE id = $1
             RETURNING {WORKING_HOURS_COLUMNS}"
        ))
        .bind(id)
        .bind(day_of_week)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(window)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM working_hours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
