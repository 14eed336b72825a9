// src/handlers/franchises.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{CanCreateFranchises, CanManageFranchises, RequireCapability},
    models::franchise::{Franchise, RenameCascadeReport},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFranchisePayload {
    /// Identificador interno, único e imutável.
    #[validate(length(min = 2, message = "O nome interno deve ter no mínimo 2 caracteres."))]
    #[schema(example = "central-sp")]
    pub internal_name: String,

    #[validate(length(min = 2, message = "O nome de exibição deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Central")]
    pub display_name: String,

    #[schema(example = "central")]
    pub slug: Option<String>,

    #[validate(length(min = 8, message = "URL de webhook inválida."))]
    pub webhook_url: Option<String>,

    #[validate(length(min = 8, message = "URL de webhook inválida."))]
    pub message_webhook_url: Option<String>,
}

/// Atualização parcial: campo ausente mantém o valor atual; string vazia
/// limpa slug e webhooks.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFranchisePayload {
    #[validate(length(min = 2, message = "O nome de exibição deve ter no mínimo 2 caracteres."))]
    pub display_name: Option<String>,

    pub slug: Option<String>,

    pub webhook_url: Option<String>,

    pub message_webhook_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetActivePayload {
    pub active: bool,
}

/// Resposta da atualização: a franquia nova e, se o nome mudou, o relatório
/// da cascata de renome.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFranchiseResponse {
    pub franchise: Franchise,
    pub rename_cascade: Option<RenameCascadeReport>,
}

// POST /api/franchises
#[utoipa::path(
    post,
    path = "/api/franchises",
    tag = "Franchises",
    request_body = CreateFranchisePayload,
    responses(
        (status = 201, description = "Franquia criada", body = Franchise),
        (status = 403, description = "Só superadmin cria franquias"),
        (status = 409, description = "Nome interno ou slug já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_franchise(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanCreateFranchises>,
    Json(payload): Json<CreateFranchisePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let franchise = app_state
        .franchise_service
        .create(
            &app_state.db_pool,
            &payload.internal_name,
            &payload.display_name,
            payload.slug.as_deref(),
            payload.webhook_url.as_deref(),
            payload.message_webhook_url.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(franchise)))
}

// GET /api/franchises
#[utoipa::path(
    get,
    path = "/api/franchises",
    tag = "Franchises",
    responses(
        (status = 200, description = "Franquias visíveis ao usuário", body = Vec<Franchise>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_franchises(
    State(app_state): State<AppState>,
    user: crate::middleware::auth::AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let franchises = app_state
        .franchise_service
        .list_for_user(&app_state.db_pool, &user.0)
        .await?;

    Ok((StatusCode::OK, Json(franchises)))
}

// GET /api/franchises/{id}
#[utoipa::path(
    get,
    path = "/api/franchises/{id}",
    tag = "Franchises",
    params(("id" = Uuid, Path, description = "ID da franquia")),
    responses(
        (status = 200, description = "Franquia", body = Franchise),
        (status = 403, description = "Sem permissão de gestão de franquias"),
        (status = 404, description = "Franquia não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_franchise(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanManageFranchises>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let franchise = app_state
        .franchise_service
        .get(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(franchise)))
}

// PATCH /api/franchises/{id}
#[utoipa::path(
    patch,
    path = "/api/franchises/{id}",
    tag = "Franchises",
    request_body = UpdateFranchisePayload,
    params(("id" = Uuid, Path, description = "ID da franquia")),
    responses(
        (status = 200, description = "Franquia atualizada (com relatório da cascata, se houve renome)", body = UpdateFranchiseResponse),
        (status = 404, description = "Franquia não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_franchise(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanManageFranchises>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFranchisePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let update = app_state
        .franchise_service
        .update(
            &app_state.db_pool,
            id,
            payload.display_name.as_deref(),
            payload.slug.as_deref(),
            payload.webhook_url.as_deref(),
            payload.message_webhook_url.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(UpdateFranchiseResponse {
            franchise: update.franchise,
            rename_cascade: update.rename_cascade,
        }),
    ))
}

// PATCH /api/franchises/{id}/active
#[utoipa::path(
    patch,
    path = "/api/franchises/{id}/active",
    tag = "Franchises",
    request_body = SetActivePayload,
    params(("id" = Uuid, Path, description = "ID da franquia")),
    responses(
        (status = 200, description = "Status ativo alterado", body = Franchise),
        (status = 403, description = "Só superadmin liga/desliga franquias")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_franchise_active(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanCreateFranchises>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActivePayload>,
) -> Result<impl IntoResponse, AppError> {
    let franchise = app_state
        .franchise_service
        .set_active(&app_state.db_pool, id, payload.active)
        .await?;

    Ok((StatusCode::OK, Json(franchise)))
}
