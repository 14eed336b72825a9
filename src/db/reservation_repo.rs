// src/db/reservation_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::reservation::{Reservation, ReservationStatus},
};

const RESERVATION_COLUMNS: &str = "id, franchise_name, customer_name, phone, date_time, \
     people, birthday, birthday_person_name, characters, status, \
     created_by, updated_by, created_at, updated_at";

/// Campos de uma reserva nova, já com o instante convertido para UTC.
#[derive(Debug, Clone)]
pub struct NewReservation<'a> {
    pub franchise_name: &'a str,
    pub customer_name: &'a str,
    pub phone: &'a str,
    pub date_time: DateTime<Utc>,
    pub people: i32,
    pub birthday: bool,
    pub birthday_person_name: Option<&'a str>,
    pub characters: Option<&'a str>,
    pub status: ReservationStatus,
    pub created_by: &'a str,
}

/// Subconjunto atualizável; `None` mantém o valor atual.
#[derive(Debug, Clone, Default)]
pub struct ReservationChanges<'a> {
    pub customer_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub date_time: Option<DateTime<Utc>>,
    pub people: Option<i32>,
    pub birthday: Option<bool>,
    pub birthday_person_name: Option<&'a str>,
    pub characters: Option<&'a str>,
    pub status: Option<ReservationStatus>,
}

/// Filtros da listagem do painel.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub franchise_name: Option<String>,
    /// Janela UTC do dia civil pedido.
    pub window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub status: Option<ReservationStatus>,
    /// Para não-superadmins: só as franquias vinculadas ao usuário.
    pub allowed_franchises: Option<Vec<String>>,
}

#[derive(Clone, Default)]
pub struct ReservationRepository;

impl ReservationRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        data: &NewReservation<'_>,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            INSERT INTO reservations (
                franchise_name, customer_name, phone, date_time, people,
                birthday, birthday_person_name, characters, status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {RESERVATION_COLUMNS}
            "#,
        ))
        .bind(data.franchise_name)
        .bind(data.customer_name)
        .bind(data.phone)
        .bind(data.date_time)
        .bind(data.people)
        .bind(data.birthday)
        .bind(data.birthday_person_name)
        .bind(data.characters)
        .bind(data.status)
        .bind(data.created_by)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // O índice parcial (franchise_name, date_time) bloqueia double-booking.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SlotUnavailable;
                }
            }
            e.into()
        })?;

        Ok(reservation)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(reservation)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        changes: &ReservationChanges<'_>,
        updated_by: &str,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            UPDATE reservations
            SET customer_name = COALESCE($2, customer_name),
                phone = COALESCE($3, phone),
                date_time = COALESCE($4, date_time),
                people = COALESCE($5, people),
                birthday = COALESCE($6, birthday),
                birthday_person_name = COALESCE($7, birthday_person_name),
                characters = COALESCE($8, characters),
                status = COALESCE($9, status),
                updated_by = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RESERVATION_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(changes.customer_name)
        .bind(changes.phone)
        .bind(changes.date_time)
        .bind(changes.people)
        .bind(changes.birthday)
        .bind(changes.birthday_person_name)
        .bind(changes.characters)
        .bind(changes.status)
        .bind(updated_by)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SlotUnavailable;
                }
            }
            AppError::from(e)
        })?
        .ok_or(AppError::ReservationNotFound)?;

        Ok(reservation)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ReservationNotFound);
        }
        Ok(())
    }

    /// Reservas vivas (status <> CANCELLED) de uma franquia dentro da janela
    /// UTC do dia civil. Alimenta o cálculo de disponibilidade.
    pub async fn list_active_in_window<'e, E>(
        &self,
        executor: E,
        franchise_name: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations
            WHERE franchise_name = $1
              AND date_time >= $2
              AND date_time < $3
              AND status <> 'CANCELLED'
            ORDER BY date_time ASC
            "#,
        ))
        .bind(franchise_name)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(executor)
        .await?;

        Ok(reservations)
    }

    /// Listagem do painel com filtros opcionais e escopo por franquia.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE 1 = 1",
        ));

        if let Some(name) = &filter.franchise_name {
            builder.push(" AND franchise_name = ").push_bind(name);
        }
        if let Some((start, end)) = filter.window {
            builder.push(" AND date_time >= ").push_bind(start);
            builder.push(" AND date_time < ").push_bind(end);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(allowed) = &filter.allowed_franchises {
            builder.push(" AND franchise_name = ANY(").push_bind(allowed).push(")");
        }
        builder.push(" ORDER BY date_time ASC, created_at ASC");

        let reservations = builder
            .build_query_as::<Reservation>()
            .fetch_all(executor)
            .await?;

        Ok(reservations)
    }
}
