// src/db/message_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::message::{ChatSummary, Message},
};

const MESSAGE_COLUMNS: &str = "id, franchise_id, chat_id, customer_name, customer_phone, \
     direction, body, external_id, created_at";

#[derive(Clone, Default)]
pub struct MessageRepository;

impl MessageRepository {
    pub fn new() -> Self {
        Self
    }

    /// Persiste uma mensagem recebida pelo webhook de entrada.
    ///
    /// Idempotente: reentregas com o mesmo `external_id` retornam `None` em
    /// vez de duplicar a linha. `created_at` usa o timestamp do provedor
    /// quando presente, para que reentregas atrasadas não desordenem a
    /// conversa.
    pub async fn insert_inbound<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        chat_id: &str,
        customer_name: Option<&str>,
        customer_phone: Option<&str>,
        body: &str,
        external_id: Option<&str>,
        sent_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Message>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let message = sqlx::query_as::<_, Message>(&format!(
            r#"
            INSERT INTO messages (
                franchise_id, chat_id, customer_name, customer_phone,
                direction, body, external_id, created_at
            )
            VALUES ($1, $2, $3, $4, 'INBOUND', $5, $6, COALESCE($7, NOW()))
            ON CONFLICT (franchise_id, external_id) WHERE external_id IS NOT NULL
                DO NOTHING
            RETURNING {MESSAGE_COLUMNS}
            "#,
        ))
        .bind(franchise_id)
        .bind(chat_id)
        .bind(customer_name)
        .bind(customer_phone)
        .bind(body)
        .bind(external_id)
        .bind(sent_at)
        .fetch_optional(executor)
        .await?;

        Ok(message)
    }

    /// Persiste uma mensagem enviada pela equipe (antes da entrega ao provedor).
    pub async fn insert_outbound<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        chat_id: &str,
        customer_phone: Option<&str>,
        body: &str,
    ) -> Result<Message, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let message = sqlx::query_as::<_, Message>(&format!(
            r#"
            INSERT INTO messages (franchise_id, chat_id, customer_phone, direction, body)
            VALUES ($1, $2, $3, 'OUTBOUND', $4)
            RETURNING {MESSAGE_COLUMNS}
            "#,
        ))
        .bind(franchise_id)
        .bind(chat_id)
        .bind(customer_phone)
        .bind(body)
        .fetch_one(executor)
        .await?;

        Ok(message)
    }

    /// Uma linha por conversa, com a mensagem mais recente primeiro.
    pub async fn list_chats<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
    ) -> Result<Vec<ChatSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let chats = sqlx::query_as::<_, ChatSummary>(
            r#"
            SELECT DISTINCT ON (chat_id)
                chat_id,
                customer_name,
                customer_phone,
                body AS last_message,
                created_at AS last_message_at
            FROM messages
            WHERE franchise_id = $1
            ORDER BY chat_id, created_at DESC
            "#,
        )
        .bind(franchise_id)
        .fetch_all(executor)
        .await?;

        Ok(latest_first(chats))
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
        let messages = sqlx::query_as::<_, Message>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE franchise_id = $1 AND chat_id = $2
            ORDER BY created_at ASC
            "#,
        ))
        .bind(franchise_id)
        .bind(chat_id)
        .fetch_all(executor)
        .await?;

        Ok(messages)
    }
}

/// Ordena os resumos da conversa mais recente para a mais antiga.
fn latest_first(mut chats: Vec<ChatSummary>) -> Vec<ChatSummary> {
    chats.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
    chats
}

#[cfg(test)]
mod tests {
    use super::latest_first;
    use crate::models::message::ChatSummary;
    use chrono::{Duration, Utc};

    fn chat(chat_id: &str, age: Duration) -> ChatSummary {
        ChatSummary {
            chat_id: chat_id.to_string(),
            customer_name: None,
            customer_phone: None,
            last_message: "olá".to_string(),
            last_message_at: Utc::now() - age,
        }
    }

    #[test]
    fn conversas_ordenadas_pela_mensagem_mais_recente() {
        let chats = vec![
            chat("antiga", Duration::hours(2)),
            chat("recente", Duration::minutes(5)),
            chat("intermediaria", Duration::hours(1)),
        ];

        let ordered = latest_first(chats);
        let ids: Vec<&str> = ordered.iter().map(|c| c.chat_id.as_str()).collect();
        assert_eq!(ids, ["recente", "intermediaria", "antiga"]);
    }
}
