// src/handlers/public.rs
//
// Superfície pública: o que a página /reserva/{slug} consome, sem token.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::reservations::CreateReservationPayload,
    models::{franchise::Franchise, reservation::{Reservation, TimeSlot}},
};

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    /// Nome de exibição (ou slug) da franquia.
    #[validate(length(min = 1, message = "required"))]
    pub franchise: String,
    /// Dia civil (YYYY-MM-DD) no fuso da franquia.
    pub date: NaiveDate,
}

// GET /api/public/franchises
#[utoipa::path(
    get,
    path = "/api/public/franchises",
    tag = "Public",
    responses(
        (status = 200, description = "Franquias ativas", body = Vec<Franchise>)
    )
)]
pub async fn list_active_franchises(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let franchises = app_state
        .franchise_service
        .list_active(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(franchises)))
}

// GET /api/public/franchises/{term}
//
// Resolução da URL pública: slug, depois nome de exibição, depois nome
// interno, case-insensitive. 404 deixa o front redirecionar para a landing.
#[utoipa::path(
    get,
    path = "/api/public/franchises/{term}",
    tag = "Public",
    params(("term" = String, Path, description = "Slug ou nome da franquia")),
    responses(
        (status = 200, description = "Franquia resolvida", body = Franchise),
        (status = 404, description = "Nenhuma franquia corresponde ao termo")
    )
)]
pub async fn resolve_franchise(
    State(app_state): State<AppState>,
    Path(term): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let franchise = app_state
        .franchise_service
        .resolve(&app_state.db_pool, &term)
        .await?;

    if !franchise.active {
        return Err(AppError::FranchiseNotFound);
    }

    Ok((StatusCode::OK, Json(franchise)))
}

// GET /api/public/availability?franchise=Central&date=2024-06-25
#[utoipa::path(
    get,
    path = "/api/public/availability",
    tag = "Public",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Grade de horários do dia", body = Vec<TimeSlot>),
        (status = 400, description = "Parâmetros ausentes ou inválidos")
    )
)]
pub async fn availability(
    State(app_state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Franquia vazia é erro de validação (400), não um 404 de resolução.
    query.validate()?;

    // A grade é indexada pelo nome de exibição denormalizado; um slug na
    // query é resolvido antes.
    let franchise = app_state
        .franchise_service
        .resolve(&app_state.db_pool, &query.franchise)
        .await?;

    let slots = app_state
        .availability_service
        .available_slots(&app_state.db_pool, &franchise.display_name, query.date)
        .await?;

    Ok((StatusCode::OK, Json(slots)))
}

// POST /api/public/reservations
//
// Formulário público: o status é sempre forçado a pending, ignorando o que
// vier no corpo.
#[utoipa::path(
    post,
    path = "/api/public/reservations",
    tag = "Public",
    request_body = CreateReservationPayload,
    responses(
        (status = 201, description = "Reserva registrada como pending", body = Reservation),
        (status = 404, description = "Franquia não encontrada ou inativa"),
        (status = 409, description = "Horário acabou de ser reservado")
    )
)]
pub async fn create_public_reservation(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let reservation = app_state
        .reservation_service
        .create_public(&app_state.db_pool, payload.into_input())
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

#[cfg(test)]
mod tests {
    use super::AvailabilityQuery;
    use chrono::NaiveDate;
    use validator::Validate;

    #[test]
    fn franquia_vazia_e_erro_de_validacao() {
        let query = AvailabilityQuery {
            franchise: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 6, 25).unwrap(),
        };
        assert!(query.validate().is_err());

        let query = AvailabilityQuery {
            franchise: "Central".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 25).unwrap(),
        };
        assert!(query.validate().is_ok());
    }
}
