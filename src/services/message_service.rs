// src/services/message_service.rs

use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FranchiseRepository, MessageRepository},
    models::message::{ChatSummary, Message},
    services::notification::NotificationDispatcher,
};

/// Mensagem recebida do webhook de entrada do provedor.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub franchise_id: Uuid,
    pub chat_id: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub message_text: String,
    pub message_id: Option<String>,
    /// Horário registrado pelo provedor; vira o `created_at` da linha.
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct MessageService {
    repo: MessageRepository,
    franchise_repo: FranchiseRepository,
    dispatcher: NotificationDispatcher,
}

impl MessageService {
    pub fn new(
        repo: MessageRepository,
        franchise_repo: FranchiseRepository,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self { repo, franchise_repo, dispatcher }
    }

    /// Persiste uma mensagem de entrada. Reentregas do provedor (mesmo
    /// messageId) retornam a deduplicação como no-op.
    pub async fn receive_inbound<'e, E>(
        &self,
        executor: E,
        inbound: InboundMessage,
    ) -> Result<Option<Message>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Copy,
    {
        self.franchise_repo
            .find_by_id(executor, inbound.franchise_id)
            .await?
            .ok_or(AppError::FranchiseNotFound)?;

        let message = self
            .repo
            .insert_inbound(
                executor,
                inbound.franchise_id,
                &inbound.chat_id,
                inbound.customer_name.as_deref(),
                inbound.customer_phone.as_deref(),
                &inbound.message_text,
                inbound.message_id.as_deref(),
                inbound.timestamp,
            )
            .await?;

        if message.is_none() {
            tracing::debug!(
                "Mensagem duplicada ignorada (franquia {}, id externo {:?}).",
                inbound.franchise_id,
                inbound.message_id
            );
        }

        Ok(message)
    }

    /// Envia uma mensagem da equipe: registra a linha OUTBOUND e repassa ao
    /// webhook de mensagens da franquia. A linha fica mesmo se a entrega
    /// falhar (at-least-once rumo ao provedor).
    pub async fn send<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        chat_id: &str,
        phone: Option<&str>,
        text: &str,
    ) -> Result<Message, AppError>
    where
        E: Executor<'e, Database = Postgres> + Copy,
    {
        let franchise = self
            .franchise_repo
            .find_by_id(executor, franchise_id)
            .await?
            .ok_or(AppError::FranchiseNotFound)?;

        let message = self
            .repo
            .insert_outbound(executor, franchise_id, chat_id, phone, text)
            .await?;

        let webhook_url = franchise
            .message_webhook_url
            .ok_or(AppError::MessageDeliveryFailed)?;

        let payload = json!({
            "franchiseId": franchise_id,
            "phone": phone,
            "text": { "message": text },
            "chatId": chat_id,
            "messageId": message.id,
        });

        self.dispatcher
            .send_chat_message(&webhook_url, &payload)
            .await
            .map_err(|e| {
                tracing::warn!(
                    "Falha ao entregar mensagem ao webhook da franquia '{}': {}",
                    franchise.display_name,
                    e
                );
                AppError::MessageDeliveryFailed
            })?;

        Ok(message)
    }

    pub async fn list_chats<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
    ) -> Result<Vec<ChatSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_chats(executor, franchise_id).await
    }

    pub async fn list_messages<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        chat_id: &str,
    ) -> Result<Vec<Message>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_messages(executor, franchise_id, chat_id).await
    }
}
