// src/db/blocked_time_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::schedule::{BlockedKind, BlockedWindow},
};

const BLOCKED_COLUMNS: &str =
    "id, barber_id, kind, starts_at, ends_at, description, created_at, updated_at";

// Repositório dos bloqueios pontuais de agenda (almoço, folga, etc).
#[derive(Clone)]
pub struct BlockedTimeRepository {
    pool: PgPool,
}

impl BlockedTimeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        barber_id: Uuid,
        kind: BlockedKind,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        description: &str,
    ) -> Result<BlockedWindow, AppError> {
        let blocked = sqlx::query_as::<_, BlockedWindow>(&format!(
            "INSERT INTO blocked_windows (barber_id, kind, starts_at, ends_at, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {BLOCKED_COLUMNS}"
        ))
        .bind(barber_id)
        .bind(kind)
        .bind(starts_at)
        .bind(ends_at)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(blocked)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BlockedWindow>, AppError> {
        let blocked = sqlx::query_as::<_, BlockedWindow>(&format!(
            "SELECT {BLOCKED_COLUMNS} FROM blocked_windows WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blocked)
    }

    /// Todos os bloqueios do barbeiro, ordenados pelo início. É sobre esta
    /// lista que o service roda o predicado de sobreposição.
    pub async fn list_by_barber(&self, barber_id: Uuid) -> Result<Vec<BlockedWindow>, AppError> {
        let blocks = sqlx::query_as::<_, BlockedWindow>(&format!(
            "SELECT {BLOCKED_COLUMNS} FROM blocked_windows
             WHERE barber_id = $1
             ORDER BY starts_at ASC"
        ))
        .bind(barber_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(blocks)
    }

    pub async fn update(
        &self,
        id: Uuid,
        kind: BlockedKind,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        description: &str,
    ) -> Result<BlockedWindow, AppError> {
        let blocked = sqlx::query_as::<_, BlockedWindow>(&format!(
            "UPDATE blocked_windows
             SET kind = $2, starts_at = $3, ends_at = $4, description = $5, updated_at = now()
             WHERE id = $1
             RETURNING {BLOCKED_COLUMNS}"
        ))
        .bind(id)
        .bind(kind)
        .bind(starts_at)
        .bind(ends_at)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(blocked)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM blocked_windows WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
