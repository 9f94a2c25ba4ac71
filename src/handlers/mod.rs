pub mod appointments;
pub mod auth;
pub mod availability;
pub mod blocked_time;
pub mod catalog;

use crate::{
    common::error::AppError,
    models::auth::{Principal, UserRole},
};

// Rotas de gestão de agenda e catálogo são exclusivas de barbeiros.
pub(crate) fn require_barber(principal: &Principal) -> Result<(), AppError> {
    if principal.role != UserRole::Barber {
        return Err(AppError::Forbidden(
            "Apenas barbeiros podem acessar este recurso.".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn require_client(principal: &Principal) -> Result<(), AppError> {
    if principal.role != UserRole::Client {
        return Err(AppError::Forbidden(
            "Apenas clientes podem acessar este recurso.".to_string(),
        ));
    }
    Ok(())
}
