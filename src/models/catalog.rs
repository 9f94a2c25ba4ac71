// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Um serviço oferecido por um barbeiro. O preço vigente aqui é copiado para
// o total do agendamento na criação; mudanças posteriores não retroagem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub barber_id: Uuid,
    #[schema(example = "Corte degradê")]
    pub name: String,
    pub description: String,
    #[schema(example = "45.00")]
    pub price: Decimal,
    // Duração em minutos. Hoje é só informativa: a detecção de conflito
    // trata o agendamento como evento pontual.
    #[schema(example = 30)]
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
