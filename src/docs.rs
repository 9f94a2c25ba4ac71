// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Catalog ---
        handlers::catalog::create_service,
        handlers::catalog::list_my_services,
        handlers::catalog::list_barber_services,
        handlers::catalog::update_service,
        handlers::catalog::delete_service,

        // --- Schedule: horários de trabalho ---
        handlers::availability::create_working_hours,
        handlers::availability::list_my_working_hours,
        handlers::availability::list_barber_hours,
        handlers::availability::update_working_hours,
        handlers::availability::delete_working_hours,
        handlers::availability::check_slot,

        // --- Schedule: bloqueios ---
        handlers::blocked_time::create_blocked_window,
        handlers::blocked_time::list_my_blocked_windows,
        handlers::blocked_time::update_blocked_window,
        handlers::blocked_time::delete_blocked_window,

        // --- Appointments ---
        handlers::appointments::create_appointment,
        handlers::appointments::list_my_appointments,
        handlers::appointments::update_appointment_status,
        handlers::appointments::cancel_appointment,
        handlers::appointments::reschedule_appointment,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::Account,
            models::auth::Principal,
            models::auth::RegisterPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Catalog ---
            models::catalog::Service,
            handlers::catalog::CreateServicePayload,
            handlers::catalog::UpdateServicePayload,

            // --- Schedule ---
            models::schedule::TimeWindow,
            models::schedule::WorkingHours,
            models::schedule::BlockedKind,
            models::schedule::BlockedWindow,
            handlers::availability::CreateWorkingHoursPayload,
            handlers::availability::UpdateWorkingHoursPayload,
            handlers::availability::SlotCheckResponse,
            handlers::blocked_time::CreateBlockedWindowPayload,
            handlers::blocked_time::UpdateBlockedWindowPayload,

            // --- Appointments ---
            models::schedule::AppointmentStatus,
            models::schedule::PaymentMethod,
            models::schedule::Appointment,
            models::schedule::ServiceSummary,
            models::schedule::AppointmentDetail,
            handlers::appointments::CreateAppointmentPayload,
            handlers::appointments::UpdateStatusPayload,
            handlers::appointments::ReschedulePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados da Conta Autenticada"),
        (name = "Catalog", description = "Catálogo de Serviços do Barbeiro"),
        (name = "Schedule", description = "Horários de Trabalho e Bloqueios de Agenda"),
        (name = "Appointments", description = "Agendamentos entre Clientes e Barbeiros")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
