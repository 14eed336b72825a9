// src/handlers/reservations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{
            CanCreateReservations, CanDeleteReservations, CanUpdateReservations,
            CanViewReservations, RequireCapability,
        },
    },
    models::reservation::{Reservation, ReservationStatus},
    services::reservation_service::{CreateReservationInput, UpdateReservationInput},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationPayload {
    /// Slug ou nome da franquia.
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "central")]
    pub franchise: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "João Pereira")]
    pub customer_name: String,

    #[validate(length(min = 8, message = "Telefone inválido."))]
    #[schema(example = "+5511999990000")]
    pub phone: String,

    /// Hora civil da franquia (America/Sao_Paulo), sem offset.
    #[schema(value_type = String, example = "2024-06-25T19:00:00")]
    pub date_time: NaiveDateTime,

    #[validate(range(min = 1, message = "A reserva precisa de ao menos 1 pessoa."))]
    #[schema(example = 2)]
    pub people: i32,

    #[serde(default)]
    pub birthday: bool,
    pub birthday_person_name: Option<String>,
    pub characters: Option<String>,

    /// Ignorado no formulário público (sempre vira pending).
    pub status: Option<ReservationStatus>,
}

impl CreateReservationPayload {
    pub fn into_input(self) -> CreateReservationInput {
        CreateReservationInput {
            franchise: self.franchise,
            customer_name: self.customer_name,
            phone: self.phone,
            local_date_time: self.date_time,
            people: self.people,
            birthday: self.birthday,
            birthday_person_name: self.birthday_person_name,
            characters: self.characters,
            status: self.status.unwrap_or(ReservationStatus::Pending),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationPayload {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Option<String>, example = "2024-06-25T20:30:00")]
    pub date_time: Option<NaiveDateTime>,
    #[validate(range(min = 1, message = "A reserva precisa de ao menos 1 pessoa."))]
    pub people: Option<i32>,
    pub birthday: Option<bool>,
    pub birthday_person_name: Option<String>,
    pub characters: Option<String>,
    pub status: Option<ReservationStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPayload {
    pub status: ReservationStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListReservationsQuery {
    /// Nome de exibição da franquia.
    pub franchise: Option<String>,
    /// Dia civil (YYYY-MM-DD) no fuso da franquia.
    pub date: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
}

// POST /api/reservations
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    request_body = CreateReservationPayload,
    responses(
        (status = 201, description = "Reserva criada", body = Reservation),
        (status = 404, description = "Franquia não encontrada"),
        (status = 409, description = "Horário indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_reservation(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanCreateReservations>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let reservation = app_state
        .reservation_service
        .create_staff(&app_state.db_pool, payload.into_input(), &user.0)
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

// GET /api/reservations
#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "Reservations",
    params(ListReservationsQuery),
    responses(
        (status = 200, description = "Reservas visíveis ao usuário", body = Vec<Reservation>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_reservations(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanViewReservations>,
    user: AuthenticatedUser,
    Query(query): Query<ListReservationsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reservations = app_state
        .reservation_service
        .list(
            &app_state.db_pool,
            query.franchise,
            query.date,
            query.status,
            &user.0,
        )
        .await?;

    Ok((StatusCode::OK, Json(reservations)))
}

// GET /api/reservations/{id}
#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva", body = Reservation),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_reservation(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanViewReservations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state
        .reservation_service
        .get(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(reservation)))
}

// PATCH /api/reservations/{id}
#[utoipa::path(
    patch,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    request_body = UpdateReservationPayload,
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva atualizada", body = Reservation),
        (status = 409, description = "Transição de status inválida ou horário indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_reservation(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanUpdateReservations>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let input = UpdateReservationInput {
        customer_name: payload.customer_name,
        phone: payload.phone,
        local_date_time: payload.date_time,
        people: payload.people,
        birthday: payload.birthday,
        birthday_person_name: payload.birthday_person_name,
        characters: payload.characters,
        status: payload.status,
    };

    let reservation = app_state
        .reservation_service
        .update(&app_state.db_pool, id, input, &user.0)
        .await?;

    Ok((StatusCode::OK, Json(reservation)))
}

// PATCH /api/reservations/{id}/status
#[utoipa::path(
    patch,
    path = "/api/reservations/{id}/status",
    tag = "Reservations",
    request_body = TransitionPayload,
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Status alterado", body = Reservation),
        (status = 409, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn transition_reservation(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanUpdateReservations>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state
        .reservation_service
        .transition(&app_state.db_pool, id, payload.status, &user.0)
        .await?;

    Ok((StatusCode::OK, Json(reservation)))
}

// DELETE /api/reservations/{id}
#[utoipa::path(
    delete,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 204, description = "Reserva excluída"),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_reservation(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CanDeleteReservations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .reservation_service
        .delete(&app_state.db_pool, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
