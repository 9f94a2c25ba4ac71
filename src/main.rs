//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de conta (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Catálogo de serviços (gestão pelo barbeiro autenticado)
    let service_routes = Router::new()
        .route(
            "/",
            post(handlers::catalog::create_service).get(handlers::catalog::list_my_services),
        )
        .route(
            "/{service_id}",
            put(handlers::catalog::update_service).delete(handlers::catalog::delete_service),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Janelas semanais de trabalho
    let hours_routes = Router::new()
        .route(
            "/",
            post(handlers::availability::create_working_hours)
                .get(handlers::availability::list_my_working_hours),
        )
        .route(
            "/{hours_id}",
            put(handlers::availability::update_working_hours)
                .delete(handlers::availability::delete_working_hours),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Bloqueios de agenda
    let blocked_routes = Router::new()
        .route(
            "/",
            post(handlers::blocked_time::create_blocked_window)
                .get(handlers::blocked_time::list_my_blocked_windows),
        )
        .route(
            "/{blocked_id}",
            put(handlers::blocked_time::update_blocked_window)
                .delete(handlers::blocked_time::delete_blocked_window),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Agendamentos
    let appointment_routes = Router::new()
        .route(
            "/",
            post(handlers::appointments::create_appointment)
                .get(handlers::appointments::list_my_appointments),
        )
        .route(
            "/{appointment_id}/status",
            patch(handlers::appointments::update_appointment_status),
        )
        .route(
            "/{appointment_id}/cancel",
            post(handlers::appointments::cancel_appointment),
        )
        .route(
            "/{appointment_id}/reschedule",
            post(handlers::appointments::reschedule_appointment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Consulta pública da vitrine e da agenda de um barbeiro
    let barber_public_routes = Router::new()
        .route(
            "/{barber_id}/services",
            get(handlers::catalog::list_barber_services),
        )
        .route(
            "/{barber_id}/hours",
            get(handlers::availability::list_barber_hours),
        )
        .route(
            "/{barber_id}/slot-check",
            get(handlers::availability::check_slot),
        );

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/services", service_routes)
        .nest("/api/schedule/hours", hours_routes)
        .nest("/api/schedule/blocked", blocked_routes)
        .nest("/api/appointments", appointment_routes)
        .nest("/api/barbers", barber_public_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
