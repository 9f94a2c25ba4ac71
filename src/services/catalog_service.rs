// src/services/catalog_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::Service,
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    fn validate_fields(price: Decimal, duration_minutes: i32) -> Result<(), AppError> {
        if price < Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "O preço não pode ser negativo.".to_string(),
            ));
        }
        if duration_minutes < 1 {
            return Err(AppError::InvalidInput(
                "A duração deve ser de pelo menos 1 minuto.".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create(
        &self,
        barber_id: Uuid,
        name: &str,
        description: &str,
        price: Decimal,
        duration_minutes: i32,
    ) -> Result<Service, AppError> {
        Self::validate_fields(price, duration_minutes)?;
        self.repo
            .create(barber_id, name, description, price, duration_minutes)
            .await
    }

    pub async fn list_by_barber(&self, barber_id: Uuid) -> Result<Vec<Service>, AppError> {
        self.repo.list_by_barber(barber_id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        requester_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        price: Option<Decimal>,
        duration_minutes: Option<i32>,
    ) -> Result<Service, AppError> {
        let service = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Serviço".to_string()))?;

        if service.barber_id != requester_id {
            return Err(AppError::Forbidden(
                "Você não tem permissão para alterar este serviço.".to_string(),
            ));
        }

        // Merge explícito dos campos opcionais sobre a linha atual.
        let name = name.unwrap_or(&service.name);
        let description = description.unwrap_or(&service.description);
        let price = price.unwrap_or(service.price);
        let duration_minutes = duration_minutes.unwrap_or(service.duration_minutes);

        Self::validate_fields(price, duration_minutes)?;

        self.repo
            .update(id, name, description, price, duration_minutes)
            .await
    }

    pub async fn delete(&self, id: Uuid, requester_id: Uuid) -> Result<(), AppError> {
        let service = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Serviço".to_string()))?;

        if service.barber_id != requester_id {
            return Err(AppError::Forbidden(
                "Você não tem permissão para excluir este serviço.".to_string(),
            ));
        }

        self.repo.delete(id).await
    }
}
