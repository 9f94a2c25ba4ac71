// src/handlers/appointments.rs

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
    handlers::require_client,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::UserRole,
        schedule::{Appointment, AppointmentDetail, AppointmentStatus, PaymentMethod},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentPayload {
    pub barber_id: Uuid,

    #[serde(default)]
    pub service_ids: Vec<Uuid>,

    #[schema(example = "2026-03-09T14:00:00Z")]
    pub scheduled_at: DateTime<Utc>,

    #[schema(example = "Card")]
    pub payment_method: PaymentMethod,

    #[validate(length(max = 500, message = "Os comentários não podem exceder 500 caracteres."))]
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    // Só Confirmed e Cancelled são aceitos; Pending é rejeitado pelo service.
    #[schema(example = "Confirmed")]
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReschedulePayload {
    #[schema(example = "2026-03-10T15:00:00Z")]
    pub new_scheduled_at: DateTime<Utc>,
}

// POST /api/appointments
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Appointments",
    request_body = CreateAppointmentPayload,
    responses(
        (status = 201, description = "Agendamento criado (Pendente)", body = Appointment),
        (status = 404, description = "Barbeiro não encontrado"),
        (status = 409, description = "Barbeiro indisponível neste instante")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_appointment(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<CreateAppointmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    require_client(&principal)?;

    let appointment = app_state
        .scheduler_service
        .create(
            principal.id,
            payload.barber_id,
            &payload.service_ids,
            payload.scheduled_at,
            payload.payment_method,
            payload.comments.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

// GET /api/appointments (agenda de quem chama, barbeiro ou cliente)
#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "Appointments",
    responses(
        (status = 200, description = "Agendamentos ordenados por data", body = [AppointmentDetail])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_appointments(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<Json<Vec<AppointmentDetail>>, AppError> {
    let appointments = match principal.role {
        UserRole::Barber => app_state.scheduler_service.list_for_barber(principal.id).await?,
        UserRole::Client => app_state.scheduler_service.list_for_client(principal.id).await?,
    };

    Ok(Json(appointments))
}

// PATCH /api/appointments/{appointment_id}/status (só o barbeiro dono)
#[utoipa::path(
    patch,
    path = "/api/appointments/{appointment_id}/status",
    tag = "Appointments",
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Appointment),
        (status = 403, description = "Requisitante não é o barbeiro do agendamento"),
        (status = 409, description = "Agendamento cancelado é terminal")
    ),
    params(
        ("appointment_id" = Uuid, Path, description = "ID do Agendamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_appointment_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = app_state
        .scheduler_service
        .update_status(appointment_id, principal.id, payload.status)
        .await?;

    Ok(Json(appointment))
}

// POST /api/appointments/{appointment_id}/cancel (cliente ou barbeiro)
#[utoipa::path(
    post,
    path = "/api/appointments/{appointment_id}/cancel",
    tag = "Appointments",
    responses(
        (status = 200, description = "Agendamento cancelado", body = Appointment),
        (status = 409, description = "Já estava cancelado")
    ),
    params(
        ("appointment_id" = Uuid, Path, description = "ID do Agendamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_appointment(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = app_state
        .scheduler_service
        .cancel(appointment_id, principal.id)
        .await?;

    Ok(Json(appointment))
}

// POST /api/appointments/{appointment_id}/reschedule (cliente ou barbeiro)
#[utoipa::path(
    post,
    path = "/api/appointments/{appointment_id}/reschedule",
    tag = "Appointments",
    request_body = ReschedulePayload,
    responses(
        (status = 200, description = "Reagendado; status volta a Pendente", body = Appointment),
        (status = 409, description = "Novo horário indisponível")
    ),
    params(
        ("appointment_id" = Uuid, Path, description = "ID do Agendamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn reschedule_appointment(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<ReschedulePayload>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = app_state
        .scheduler_service
        .reschedule(appointment_id, principal.id, payload.new_scheduled_at)
        .await?;

    Ok(Json(appointment))
}
