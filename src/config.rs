// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        AppointmentRepository, AvailabilityRepository, BlockedTimeRepository,
        CatalogRepository, UserRepository,
    },
    services::{
        AuthService, AvailabilityService, BlockedTimeService, CatalogService, SchedulerService,
    },
};

// O estado compartilhado, montado uma vez na inicialização e clonado para o
// router. Nada de singleton implícito: toda dependência nasce aqui.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub availability_service: AvailabilityService,
    pub blocked_time_service: BlockedTimeService,
    pub scheduler_service: SchedulerService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let availability_repo = AvailabilityRepository::new(db_pool.clone());
        let blocked_time_repo = BlockedTimeRepository::new(db_pool.clone());
        let appointment_repo = AppointmentRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let catalog_service = CatalogService::new(catalog_repo.clone());
        let availability_service = AvailabilityService::new(availability_repo);
        let blocked_time_service =
            BlockedTimeService::new(blocked_time_repo, appointment_repo.clone());
        let scheduler_service =
            SchedulerService::new(appointment_repo, catalog_repo, user_repo);

        Ok(Self {
            db_pool,
            auth_service,
            catalog_service,
            availability_service,
            blocked_time_service,
            scheduler_service,
        })
    }
}
