// src/models/schedule.rs

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// =============================================================================
//  JANELA DE TEMPO
// =============================================================================

/// Predicado único de sobreposição de intervalos semiabertos [início, fim).
/// Intervalos que apenas se tocam ([0,10) e [10,20)) NÃO se sobrepõem.
/// Todo teste de colisão do sistema (agenda, bloqueios, horários) passa por aqui.
pub fn overlap_half_open<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

// Intervalo absoluto [start, end) no calendário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    // Invariante: end > start.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AppError> {
        if end <= start {
            return Err(AppError::InvalidInput(
                "A data final deve ser posterior à data inicial.".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        overlap_half_open(self.start, self.end, other.start, other.end)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Converte hora do dia em minutos desde a meia-noite, a unidade usada
/// para comparar janelas recorrentes.
pub fn minutes_since_midnight(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Interpreta horários "HH:MM" vindos dos payloads.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| AppError::InvalidInput(format!("Horário inválido: '{}' (esperado HH:MM).", raw)))
}

// =============================================================================
//  HORÁRIO DE TRABALHO (janela semanal recorrente)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    pub id: Uuid,
    pub barber_id: Uuid,
    // 0 = Domingo, ..., 6 = Sábado
    #[schema(example = 1)]
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
//  BLOQUEIO DE AGENDA
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "blocked_kind")]
pub enum BlockedKind {
    Meal,
    Break,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockedWindow {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub kind: BlockedKind,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[schema(example = "Pausa para o almoço")]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlockedWindow {
    // O banco garante ends_at > starts_at, então a janela é sempre válida.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.starts_at,
            end: self.ends_at,
        }
    }
}

// =============================================================================
//  AGENDAMENTO
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "appointment_status")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    /// Cancelado é terminal. Pendente nunca é destino de uma atualização de
    /// status direta: só o reagendamento rebaixa o agendamento para Pendente.
    pub fn allows_transition_to(self, next: AppointmentStatus) -> bool {
        match (self, next) {
            (AppointmentStatus::Cancelled, _) => false,
            (_, AppointmentStatus::Confirmed) | (_, AppointmentStatus::Cancelled) => true,
            (_, AppointmentStatus::Pending) => false,
        }
    }

    pub fn is_cancelled(self) -> bool {
        matches!(self, AppointmentStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method")]
pub enum PaymentMethod {
    Transfer,
    Cash,
    Card,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub barber_id: Uuid,
    // O agendamento é um evento pontual: nenhuma duração é considerada
    // na detecção de colisão, só o instante exato.
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub payment_method: PaymentMethod,
    // Soma dos preços fotografada na criação; não é recalculada depois.
    #[schema(example = "85.00")]
    pub total: Decimal,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Resumo de serviço resolvido na leitura (join de exibição, não
// desnormalização gravada).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: Uuid,
    #[schema(example = "Corte degradê")]
    pub name: String,
    #[schema(example = "45.00")]
    pub price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetail {
    #[serde(flatten)]
    pub header: Appointment,
    pub client_name: Option<String>,
    pub barber_name: Option<String>,
    pub services: Vec<ServiceSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, h, m, 0).unwrap()
    }

    fn window(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> TimeWindow {
        TimeWindow::new(at(start_h, start_m), at(end_h, end_m)).unwrap()
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = window(9, 0, 12, 0);
        let b = window(11, 0, 15, 0);
        let c = window(13, 0, 14, 0);

        assert_eq!(a.overlaps(&b), b.overlaps(&a));
        assert!(a.overlaps(&b));
        assert_eq!(a.overlaps(&c), c.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        // [09:00, 10:00) e [10:00, 11:00) apenas se tocam.
        let a = window(9, 0, 10, 0);
        let b = window(10, 0, 11, 0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contained_window_overlaps() {
        let outer = window(9, 0, 18, 0);
        let inner = window(12, 0, 13, 0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn window_rejects_inverted_bounds() {
        assert!(TimeWindow::new(at(12, 0), at(9, 0)).is_err());
        assert!(TimeWindow::new(at(12, 0), at(12, 0)).is_err());
    }

    #[test]
    fn contains_is_half_open() {
        let w = window(13, 30, 14, 30);
        assert!(w.contains(at(13, 30)));
        assert!(w.contains(at(14, 0)));
        assert!(!w.contains(at(14, 30)));
        assert!(!w.contains(at(13, 29)));
    }

    #[test]
    fn overlap_works_on_minutes_of_day() {
        // [09:00, 12:00) x [11:00, 15:00) em minutos desde a meia-noite.
        assert!(overlap_half_open(540, 720, 660, 900));
        // [09:00, 11:00) x [11:00, 15:00) apenas se tocam.
        assert!(!overlap_half_open(540, 660, 660, 900));
    }

    #[test]
    fn minutes_conversion() {
        let t = parse_time_of_day("09:30").unwrap();
        assert_eq!(minutes_since_midnight(t), 570);
        assert_eq!(minutes_since_midnight(NaiveTime::from_hms_opt(0, 0, 0).unwrap()), 0);
    }

    #[test]
    fn parse_time_of_day_rejects_garbage() {
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("9h30").is_err());
        assert!(parse_time_of_day("").is_err());
    }

    #[test]
    fn cancelled_is_terminal() {
        use AppointmentStatus::*;
        assert!(!Cancelled.allows_transition_to(Confirmed));
        assert!(!Cancelled.allows_transition_to(Pending));
        assert!(!Cancelled.allows_transition_to(Cancelled));
    }

    #[test]
    fn pending_and_confirmed_can_move_forward() {
        use AppointmentStatus::*;
        assert!(Pending.allows_transition_to(Confirmed));
        assert!(Pending.allows_transition_to(Cancelled));
        assert!(Confirmed.allows_transition_to(Cancelled));
        // Confirmada -> Confirmada é idempotente e permitido pela máquina,
        // mas ninguém volta para Pendente fora do reagendamento.
        assert!(!Confirmed.allows_transition_to(Pending));
    }
}
