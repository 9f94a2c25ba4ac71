// src/handlers/availability.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::require_barber,
    middleware::auth::AuthenticatedUser,
    models::schedule::{parse_time_of_day, WorkingHours},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkingHoursPayload {
    // 0 = Domingo, ..., 6 = Sábado
    #[validate(range(min = 0, max = 6, message = "O dia da semana deve estar entre 0 e 6."))]
    #[schema(example = 1)]
    pub day_of_week: i16,

    #[schema(example = "09:00")]
    pub start_time: String,

    #[schema(example = "18:00")]
    pub end_time: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkingHoursPayload {
    #[validate(range(min = 0, max = 6, message = "O dia da semana deve estar entre 0 e 6."))]
    pub day_of_week: Option<i16>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

// POST /api/schedule/hours
#[utoipa::path(
    post,
    path = "/api/schedule/hours",
    tag = "Schedule",
    request_body = CreateWorkingHoursPayload,
    responses(
        (status = 201, description = "Horário de trabalho criado", body = WorkingHours),
        (status = 409, description = "Sobreposição com horário existente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_working_hours(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<CreateWorkingHoursPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    require_barber(&principal)?;

    let start_time = parse_time_of_day(&payload.start_time)?;
    let end_time = parse_time_of_day(&payload.end_time)?;

    let window = app_state
        .availability_service
        .create(principal.id, payload.day_of_week, start_time, end_time)
        .await?;

    Ok((StatusCode::CREATED, Json(window)))
}

// GET /api/schedule/hours (horários do barbeiro autenticado)
#[utoipa::path(
    get,
    path = "/api/schedule/hours",
    tag = "Schedule",
    responses(
        (status = 200, description = "Horários ordenados por (dia, início)", body = [WorkingHours])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_working_hours(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<Json<Vec<WorkingHours>>, AppError> {
    require_barber(&principal)?;

    let windows = app_state.availability_service.list(principal.id).await?;
    Ok(Json(windows))
}

// GET /api/barbers/{barber_id}/hours (consulta pública)
#[utoipa::path(
    get,
    path = "/api/barbers/{barber_id}/hours",
    tag = "Schedule",
    responses(
        (status = 200, description = "Horários públicos do barbeiro", body = [WorkingHours])
    ),
    params(
        ("barber_id" = Uuid, Path, description = "ID do Barbeiro")
    )
)]
pub async fn list_barber_hours(
    State(app_state): State<AppState>,
    Path(barber_id): Path<Uuid>,
) -> Result<Json<Vec<WorkingHours>>, AppError> {
    let windows = app_state.availability_service.list(barber_id).await?;
    Ok(Json(windows))
}

// PUT /api/schedule/hours/{hours_id}
#[utoipa::path(
    put,
    path = "/api/schedule/hours/{hours_id}",
    tag = "Schedule",
    request_body = UpdateWorkingHoursPayload,
    responses(
        (status = 200, description = "Horário atualizado", body = WorkingHours),
        (status = 404, description = "Horário não encontrado"),
        (status = 409, description = "Sobreposição com horário existente")
    ),
    params(
        ("hours_id" = Uuid, Path, description = "ID do Horário")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_working_hours(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(hours_id): Path<Uuid>,
    Json(payload): Json<UpdateWorkingHoursPayload>,
) -> Result<Json<WorkingHours>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    require_barber(&principal)?;

    let start_time = payload.start_time.as_deref().map(parse_time_of_day).transpose()?;
    let end_time = payload.end_time.as_deref().map(parse_time_of_day).transpose()?;

    let window = app_state
        .availability_service
        .update(hours_id, principal.id, payload.day_of_week, start_time, end_time)
        .await?;

    Ok(Json(window))
}

// DELETE /api/schedule/hours/{hours_id}
#[utoipa::path(
    delete,
    path = "/api/schedule/hours/{hours_id}",
    tag = "Schedule",
    responses(
        (status = 204, description = "Horário excluído"),
        (status = 409, description = "Horário ativo neste momento")
    ),
    params(
        ("hours_id" = Uuid, Path, description = "ID do Horário")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_working_hours(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(hours_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    require_barber(&principal)?;

    app_state.availability_service.delete(hours_id, principal.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Consulta de disponibilidade de um instante ---

#[derive(Debug, Deserialize)]
pub struct SlotCheckQuery {
    pub at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotCheckResponse {
    pub within_working_hours: bool,
    pub blocked: bool,
    pub slot_taken: bool,
}

// GET /api/barbers/{barber_id}/slot-check?at=...
// Consultivo: a criação de agendamento só valida a colisão de instante exato.
#[utoipa::path(
    get,
    path = "/api/barbers/{barber_id}/slot-check",
    tag = "Schedule",
    responses(
        (status = 200, description = "Situação do instante na agenda do barbeiro", body = SlotCheckResponse)
    ),
    params(
        ("barber_id" = Uuid, Path, description = "ID do Barbeiro"),
        ("at" = String, Query, description = "Instante (RFC 3339), ex: 2026-03-09T14:00:00Z")
    )
)]
pub async fn check_slot(
    State(app_state): State<AppState>,
    Path(barber_id): Path<Uuid>,
    Query(query): Query<SlotCheckQuery>,
) -> Result<Json<SlotCheckResponse>, AppError> {
    let within_working_hours = app_state
        .availability_service
        .is_within_availability(barber_id, query.at)
        .await?;
    let blocked = app_state
        .blocked_time_service
        .is_blocked(barber_id, query.at)
        .await?;
    let slot_taken = app_state
        .scheduler_service
        .find_active_at(barber_id, query.at)
        .await?
        .is_some();

    Ok(Json(SlotCheckResponse {
        within_working_hours,
        blocked,
        slot_taken,
    }))
}
