// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, Principal, UserRole},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn register(
        &self,
        role: UserRole,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<String, AppError> {
        // O hashing é pesado demais para o runtime assíncrono; roda em
        // uma thread separada.
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let account = self
            .user_repo
            .create(role, name, email, &hashed_password, phone)
            .await?;

        tracing::info!("✅ Conta criada: {} ({:?})", account.email, role);

        self.create_token(account.id, role)
    }

    pub async fn login(
        &self,
        role: UserRole,
        email: &str,
        password: &str,
    ) -> Result<String, AppError> {
        let account = self
            .user_repo
            .find_by_email(role, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = account.password_hash.clone();

        // Executa a verificação em uma thread separada
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(account.id, role)
    }

    /// Valida o token e resolve a conta na tabela indicada pelo papel
    /// embutido nas claims.
    pub async fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let role = token_data.claims.role;
        let account = self
            .user_repo
            .find_by_id(role, token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(Principal {
            id: account.id,
            role,
            name: account.name,
            email: account.email,
        })
    }

    fn create_token(&self, account_id: Uuid, role: UserRole) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: account_id,
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
