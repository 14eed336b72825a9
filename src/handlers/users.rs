// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CanManageUsers, RequireCapability},
    },
    models::{auth::User, franchise::UserFranchise, rbac::Role},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignFranchisePayload {
    pub franchise_id: Uuid,
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Todos os usuários", body = Vec<User>),
        (status = 403, description = "Só superadmin gerencia usuários")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanManageUsers>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(users)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 403, description = "Papel não atribuível por este usuário"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanManageUsers>,
    acting: AuthenticatedUser,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .create(
            &app_state.db_pool,
            &payload.name,
            &payload.email,
            &payload.password,
            payload.role,
            &acting.0,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// PATCH /api/users/{id}
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanManageUsers>,
    acting: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .update(
            &app_state.db_pool,
            id,
            payload.name.as_deref(),
            payload.role,
            &acting.0,
        )
        .await?;

    Ok((StatusCode::OK, Json(user)))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário excluído"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanManageUsers>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.delete(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/users/{id}/franchises
#[utoipa::path(
    get,
    path = "/api/users/{id}/franchises",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Vínculos do usuário", body = Vec<UserFranchise>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_user_franchises(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanManageUsers>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let bindings = app_state
        .user_service
        .list_bindings(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(bindings)))
}

// POST /api/users/{id}/franchises
#[utoipa::path(
    post,
    path = "/api/users/{id}/franchises",
    tag = "Users",
    request_body = AssignFranchisePayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 201, description = "Vínculo criado", body = UserFranchise),
        (status = 409, description = "Vínculo já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_franchise(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanManageUsers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignFranchisePayload>,
) -> Result<impl IntoResponse, AppError> {
    let binding = app_state
        .user_service
        .assign_franchise(&app_state.db_pool, id, payload.franchise_id)
        .await?;

    Ok((StatusCode::CREATED, Json(binding)))
}

// DELETE /api/users/{id}/franchises/{franchise_id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}/franchises/{franchise_id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "ID do usuário"),
        ("franchise_id" = Uuid, Path, description = "ID da franquia")
    ),
    responses(
        (status = 204, description = "Vínculo removido"),
        (status = 404, description = "Vínculo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn unassign_franchise(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanManageUsers>,
    Path((id, franchise_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .user_service
        .unassign_franchise(&app_state.db_pool, id, franchise_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
