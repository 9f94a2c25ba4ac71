// src/handlers/blocked_time.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::require_barber,
    middleware::auth::AuthenticatedUser,
    models::schedule::{BlockedKind, BlockedWindow},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockedWindowPayload {
    #[schema(example = "Meal")]
    pub kind: BlockedKind,

    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,

    #[validate(length(max = 200, message = "A descrição não pode exceder 200 caracteres."))]
    #[serde(default)]
    #[schema(example = "Pausa para o almoço")]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlockedWindowPayload {
    pub kind: Option<BlockedKind>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,

    #[validate(length(max = 200, message = "A descrição não pode exceder 200 caracteres."))]
    pub description: Option<String>,
}

// POST /api/schedule/blocked
#[utoipa::path(
    post,
    path = "/api/schedule/blocked",
    tag = "Schedule",
    request_body = CreateBlockedWindowPayload,
    responses(
        (status = 201, description = "Bloqueio criado", body = BlockedWindow),
        (status = 409, description = "Colisão com bloqueio ou agendamento existente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_blocked_window(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<CreateBlockedWindowPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    require_barber(&principal)?;

    let blocked = app_state
        .blocked_time_service
        .create(
            principal.id,
            payload.kind,
            payload.starts_at,
            payload.ends_at,
            &payload.description,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(blocked)))
}

// GET /api/schedule/blocked
#[utoipa::path(
    get,
    path = "/api/schedule/blocked",
    tag = "Schedule",
    responses(
        (status = 200, description = "Bloqueios do barbeiro autenticado", body = [BlockedWindow])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_blocked_windows(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<Json<Vec<BlockedWindow>>, AppError> {
    require_barber(&principal)?;

    let blocks = app_state.blocked_time_service.list(principal.id).await?;
    Ok(Json(blocks))
}

// PUT /api/schedule/blocked/{blocked_id}
#[utoipa::path(
    put,
    path = "/api/schedule/blocked/{blocked_id}",
    tag = "Schedule",
    request_body = UpdateBlockedWindowPayload,
    responses(
        (status = 200, description = "Bloqueio atualizado", body = BlockedWindow),
        (status = 404, description = "Bloqueio não encontrado"),
        (status = 409, description = "Colisão com bloqueio ou agendamento existente")
    ),
    params(
        ("blocked_id" = Uuid, Path, description = "ID do Bloqueio")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_blocked_window(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(blocked_id): Path<Uuid>,
    Json(payload): Json<UpdateBlockedWindowPayload>,
) -> Result<Json<BlockedWindow>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    require_barber(&principal)?;

    let blocked = app_state
        .blocked_time_service
        .update(
            blocked_id,
            principal.id,
            payload.kind,
            payload.starts_at,
            payload.ends_at,
            payload.description.as_deref(),
        )
        .await?;

    Ok(Json(blocked))
}

// DELETE /api/schedule/blocked/{blocked_id}
#[utoipa::path(
    delete,
    path = "/api/schedule/blocked/{blocked_id}",
    tag = "Schedule",
    responses(
        (status = 204, description = "Bloqueio excluído"),
        (status = 409, description = "Há agendamentos no intervalo")
    ),
    params(
        ("blocked_id" = Uuid, Path, description = "ID do Bloqueio")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_blocked_window(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(blocked_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    require_barber(&principal)?;

    app_state.blocked_time_service.delete(blocked_id, principal.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
