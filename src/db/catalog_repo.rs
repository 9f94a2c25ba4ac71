// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::catalog::Service};

const SERVICE_COLUMNS: &str =
    "id, barber_id, name, description, price, duration_minutes, created_at, updated_at";

// Repositório do catálogo de serviços dos barbeiros.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        barber_id: Uuid,
        name: &str,
        description: &str,
        price: Decimal,
        duration_minutes: i32,
    ) -> Result<Service, AppError> {
        let service = sqlx::query_as::<_, Service>(&format!(
            "INSERT INTO services (barber_id, name, description, price, duration_minutes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(barber_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(duration_minutes)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    /// Resolve um conjunto de ids de uma vez. Quem chama compara o tamanho do
    /// resultado com o pedido para detectar ids inexistentes.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Service>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let services = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    pub async fn list_by_barber(&self, barber_id: Uuid) -> Result<Vec<Service>, AppError> {
        let services = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE barber_id = $1 ORDER BY name ASC"
        ))
        .bind(barber_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    // O merge de campos opcionais acontece no service; aqui a linha inteira é regravada.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
        price: Decimal,
        duration_minutes: i32,
    ) -> Result<Service, AppError> {
        let service = sqlx::query_as::<_, Service>(&format!(
            "UPDATE services
             SET name = $2, description = $3, price = $4, duration_minutes = $5, updated_at = now()
             WHERE id = $1
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(duration_minutes)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
