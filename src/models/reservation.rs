// src/models/reservation.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::timezone;

// Mapeia o CREATE TYPE reservation_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// Máquina de estados do ciclo de vida. `Cancelled` é terminal.
    ///
    /// pending -> {approved, confirmed, cancelled}
    /// approved -> {confirmed, cancelled}
    /// confirmed -> {cancelled}
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;

        match (self, next) {
            (Pending, Approved) | (Pending, Confirmed) | (Pending, Cancelled) => true,
            (Approved, Confirmed) | (Approved, Cancelled) => true,
            (Confirmed, Cancelled) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Approved => "approved",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,

    /// Nome de exibição da franquia, denormalizado (não é FK).
    #[schema(example = "Central")]
    pub franchise_name: String,

    #[schema(example = "João Pereira")]
    pub customer_name: String,
    #[schema(example = "+5511999990000")]
    pub phone: String,

    /// Instante absoluto em UTC. A hora civil é America/Sao_Paulo.
    pub date_time: DateTime<Utc>,

    #[schema(example = 4)]
    pub people: i32,

    pub birthday: bool,
    pub birthday_person_name: Option<String>,
    /// Texto livre (personagens/temas pedidos pelo cliente).
    pub characters: Option<String>,

    pub status: ReservationStatus,

    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// A hora de parede da reserva no fuso da franquia.
    pub fn local_date_time(&self) -> NaiveDateTime {
        timezone::utc_to_local(self.date_time)
    }
}

/// Um horário da grade de meia em meia hora. Derivado, nunca persistido.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// "HH:MM" na hora civil da franquia.
    #[schema(example = "14:00")]
    pub time: String,
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::ReservationStatus::*;

    #[test]
    fn pending_sai_para_qualquer_estado() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
    }

    #[test]
    fn apos_aprovacao_so_avanca_ou_cancela() {
        assert!(Approved.can_transition_to(Confirmed));
        assert!(Approved.can_transition_to(Cancelled));
        assert!(!Approved.can_transition_to(Pending));

        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Approved));
        assert!(!Confirmed.can_transition_to(Pending));
    }

    #[test]
    fn cancelled_e_terminal() {
        for next in [Pending, Approved, Confirmed, Cancelled] {
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn nenhum_estado_transita_para_si_mesmo() {
        for st in [Pending, Approved, Confirmed, Cancelled] {
            assert!(!st.can_transition_to(st));
        }
    }
}
