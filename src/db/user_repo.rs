// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Account, UserRole},
};

// Repositório das contas. Barbeiros e clientes têm o mesmo formato mas vivem
// em tabelas separadas; o papel escolhe a tabela (resolução por tag).
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn table(role: UserRole) -> &'static str {
        match role {
            UserRole::Barber => "barbers",
            UserRole::Client => "clients",
        }
    }

    pub async fn find_by_id(&self, role: UserRole, id: Uuid) -> Result<Option<Account>, AppError> {
        let sql = format!(
            "SELECT id, name, email, password_hash, phone, created_at, updated_at
             FROM {} WHERE id = $1",
            Self::table(role)
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    pub async fn find_by_email(&self, role: UserRole, email: &str) -> Result<Option<Account>, AppError> {
        let sql = format!(
            "SELECT id, name, email, password_hash, phone, created_at, updated_at
             FROM {} WHERE email = $1",
            Self::table(role)
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    // Cria uma nova conta no banco de dados
    pub async fn create(
        &self,
        role: UserRole,
        name: &str,
        email: &str,
        hashed_password: &str,
        phone: Option<&str>,
    ) -> Result<Account, AppError> {
        let sql = format!(
            "INSERT INTO {} (name, email, password_hash, phone)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, password_hash, phone, created_at, updated_at",
            Self::table(role)
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(name)
            .bind(email)
            .bind(hashed_password)
            .bind(phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // Converte erro de violação de chave única em um erro mais amigável
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::EmailAlreadyExists;
                    }
                }
                e.into()
            })
    }

    /// Resolve nomes para exibição (join de leitura das listagens de agenda).
    pub async fn find_names(
        &self,
        role: UserRole,
        ids: &[Uuid],
    ) -> Result<Vec<(Uuid, String)>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name FROM {} WHERE id = ANY($1)",
            Self::table(role)
        );
        let rows = sqlx::query_as::<_, (Uuid, String)>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
