// src/handlers/messages.rs
//
// Inbox de mensagens (WhatsApp): webhook de entrada do provedor + leitura e
// envio pela equipe.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{CanSendMessages, CanViewReservations, RequireCapability},
    models::message::{ChatSummary, Message},
    services::message_service::InboundMessage,
};

/// Corpo do webhook de entrada, no formato que o provedor envia.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessagePayload {
    pub franchise_id: Uuid,

    #[validate(length(min = 1, message = "required"))]
    pub chat_id: String,

    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    pub message_text: String,

    pub message_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[validate(length(min = 1, message = "required"))]
    pub chat_id: String,

    pub phone: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    pub message: String,
}

// POST /api/webhooks/messages
#[utoipa::path(
    post,
    path = "/api/webhooks/messages",
    tag = "Messages",
    request_body = InboundMessagePayload,
    responses(
        (status = 201, description = "Mensagem registrada", body = Message),
        (status = 200, description = "Reentrega duplicada, ignorada"),
        (status = 404, description = "Franquia não encontrada")
    )
)]
pub async fn inbound_message(
    State(app_state): State<AppState>,
    Json(payload): Json<InboundMessagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let inbound = InboundMessage {
        franchise_id: payload.franchise_id,
        chat_id: payload.chat_id,
        customer_name: payload.customer_name,
        customer_phone: payload.customer_phone,
        message_text: payload.message_text,
        message_id: payload.message_id,
        timestamp: payload.timestamp,
    };

    match app_state
        .message_service
        .receive_inbound(&app_state.db_pool, inbound)
        .await?
    {
        Some(message) => Ok((StatusCode::CREATED, Json(message)).into_response()),
        None => Ok(StatusCode::OK.into_response()),
    }
}

// GET /api/franchises/{id}/chats
#[utoipa::path(
    get,
    path = "/api/franchises/{id}/chats",
    tag = "Messages",
    params(("id" = Uuid, Path, description = "ID da franquia")),
    responses(
        (status = 200, description = "Conversas da franquia, mais recentes primeiro", body = Vec<ChatSummary>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_chats(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanViewReservations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let chats = app_state
        .message_service
        .list_chats(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(chats)))
}

// GET /api/franchises/{id}/chats/{chat_id}
#[utoipa::path(
    get,
    path = "/api/franchises/{id}/chats/{chat_id}",
    tag = "Messages",
    params(
        ("id" = Uuid, Path, description = "ID da franquia"),
        ("chat_id" = String, Path, description = "ID da conversa")
    ),
    responses(
        (status = 200, description = "Mensagens da conversa, em ordem cronológica", body = Vec<Message>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_messages(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanViewReservations>,
    Path((id, chat_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, AppError> {
    let messages = app_state
        .message_service
        .list_messages(&app_state.db_pool, id, &chat_id)
        .await?;

    Ok((StatusCode::OK, Json(messages)))
}

// POST /api/franchises/{id}/messages
#[utoipa::path(
    post,
    path = "/api/franchises/{id}/messages",
    tag = "Messages",
    request_body = SendMessagePayload,
    params(("id" = Uuid, Path, description = "ID da franquia")),
    responses(
        (status = 201, description = "Mensagem registrada e entregue", body = Message),
        (status = 403, description = "Sem permissão de envio de mensagens"),
        (status = 502, description = "Registrada, mas a entrega ao provedor falhou")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanSendMessages>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let message = app_state
        .message_service
        .send(
            &app_state.db_pool,
            id,
            &payload.chat_id,
            payload.phone.as_deref(),
            &payload.message,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}
