// src/handlers/catalog.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::require_barber,
    middleware::auth::AuthenticatedUser,
    models::catalog::Service,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Corte degradê")]
    pub name: String,

    #[validate(length(max = 500, message = "A descrição não pode exceder 500 caracteres."))]
    #[serde(default)]
    pub description: String,

    #[schema(example = "45.00")]
    pub price: Decimal,

    #[schema(example = 30)]
    pub duration_minutes: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServicePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "A descrição não pode exceder 500 caracteres."))]
    pub description: Option<String>,

    pub price: Option<Decimal>,
    pub duration_minutes: Option<i32>,
}

// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Catalog",
    request_body = CreateServicePayload,
    responses(
        (status = 201, description = "Serviço criado", body = Service)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<CreateServicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    require_barber(&principal)?;

    let service = app_state
        .catalog_service
        .create(
            principal.id,
            &payload.name,
            &payload.description,
            payload.price,
            payload.duration_minutes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(service)))
}

// GET /api/services (catálogo do barbeiro autenticado)
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Catalog",
    responses(
        (status = 200, description = "Serviços do barbeiro autenticado", body = [Service])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_services(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<Json<Vec<Service>>, AppError> {
    require_barber(&principal)?;

    let services = app_state.catalog_service.list_by_barber(principal.id).await?;
    Ok(Json(services))
}

// GET /api/barbers/{barber_id}/services (vitrine pública)
#[utoipa::path(
    get,
    path = "/api/barbers/{barber_id}/services",
    tag = "Catalog",
    responses(
        (status = 200, description = "Catálogo público do barbeiro", body = [Service])
    ),
    params(
        ("barber_id" = Uuid, Path, description = "ID do Barbeiro")
    )
)]
pub async fn list_barber_services(
    State(app_state): State<AppState>,
    Path(barber_id): Path<Uuid>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = app_state.catalog_service.list_by_barber(barber_id).await?;
    Ok(Json(services))
}

// PUT /api/services/{service_id}
#[utoipa::path(
    put,
    path = "/api/services/{service_id}",
    tag = "Catalog",
    request_body = UpdateServicePayload,
    responses(
        (status = 200, description = "Serviço atualizado", body = Service),
        (status = 404, description = "Serviço não encontrado")
    ),
    params(
        ("service_id" = Uuid, Path, description = "ID do Serviço")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(service_id): Path<Uuid>,
    Json(payload): Json<UpdateServicePayload>,
) -> Result<Json<Service>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    require_barber(&principal)?;

    let service = app_state
        .catalog_service
        .update(
            service_id,
            principal.id,
            payload.name.as_deref(),
            payload.description.as_deref(),
            payload.price,
            payload.duration_minutes,
        )
        .await?;

    Ok(Json(service))
}

// DELETE /api/services/{service_id}
#[utoipa::path(
    delete,
    path = "/api/services/{service_id}",
    tag = "Catalog",
    responses(
        (status = 204, description = "Serviço excluído"),
        (status = 404, description = "Serviço não encontrado")
    ),
    params(
        ("service_id" = Uuid, Path, description = "ID do Serviço")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_service(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(service_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    require_barber(&principal)?;

    app_state.catalog_service.delete(service_id, principal.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
