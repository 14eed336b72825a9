// src/models/message.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "message_direction", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Inbound,
    Outbound,
}

/// Uma mensagem da inbox (WhatsApp) de uma franquia.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub franchise_id: Uuid,
    pub chat_id: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub direction: MessageDirection,
    pub body: String,
    /// ID do provedor; deduplica reentregas do webhook de entrada.
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Resumo de uma conversa para a lista de chats (última mensagem por chat).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub chat_id: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
}
