// src/models/franchise.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Uma franquia (unidade física do restaurante).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Franchise {
    pub id: Uuid,

    /// Identificador interno, único e imutável após a criação.
    #[schema(example = "central-sp")]
    pub internal_name: String,

    /// Nome voltado ao cliente. Mudanças disparam a cascata de renome.
    #[schema(example = "Central")]
    pub display_name: String,

    /// Slug opcional para a página pública /reserva/{slug}.
    #[schema(example = "central")]
    pub slug: Option<String>,

    pub active: bool,

    /// Webhook de notificação de novas reservas.
    pub webhook_url: Option<String>,

    /// Webhook de saída de mensagens (inbox WhatsApp).
    pub message_webhook_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vínculo usuário <-> franquia. Restringe o que um não-superadmin enxerga.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserFranchise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub franchise_id: Uuid,
    // Cópia denormalizada do display_name, coberta pela cascata de renome.
    pub franchise_name: String,
}

/// Resultado da cascata de renome: quantas linhas cada tabela reescreveu.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameCascadeReport {
    pub reservations_updated: u64,
    pub user_franchises_updated: u64,
}
