// src/services/reservation_service.rs

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, timezone},
    db::{
        reservation_repo::{NewReservation, ReservationChanges, ReservationFilter},
        FranchiseRepository, ReservationRepository, UserRepository,
    },
    models::{
        auth::User,
        rbac::Role,
        reservation::{Reservation, ReservationStatus},
    },
    services::notification::NotificationDispatcher,
};

/// Dados de entrada de uma reserva nova, ainda na hora civil da franquia.
#[derive(Debug, Clone)]
pub struct CreateReservationInput {
    /// Slug ou nome da franquia, como veio da URL pública ou do painel.
    pub franchise: String,
    pub customer_name: String,
    pub phone: String,
    pub local_date_time: NaiveDateTime,
    pub people: i32,
    pub birthday: bool,
    pub birthday_person_name: Option<String>,
    pub characters: Option<String>,
    pub status: ReservationStatus,
}

impl CreateReservationInput {
    /// O formulário público nunca escolhe o status: qualquer valor vindo do
    /// visitante é coagido a PENDING antes de persistir.
    pub fn normalized_for_public(mut self) -> Self {
        self.status = ReservationStatus::Pending;
        self
    }
}

/// Subconjunto atualizável de uma reserva.
#[derive(Debug, Clone, Default)]
pub struct UpdateReservationInput {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub local_date_time: Option<NaiveDateTime>,
    pub people: Option<i32>,
    pub birthday: Option<bool>,
    pub birthday_person_name: Option<String>,
    pub characters: Option<String>,
    pub status: Option<ReservationStatus>,
}

/// Identidade carimbada em created_by/updated_by.
pub const PUBLIC_PRINCIPAL: &str = "public";

#[derive(Clone)]
pub struct ReservationService {
    repo: ReservationRepository,
    franchise_repo: FranchiseRepository,
    user_repo: UserRepository,
    dispatcher: NotificationDispatcher,
}

impl ReservationService {
    pub fn new(
        repo: ReservationRepository,
        franchise_repo: FranchiseRepository,
        user_repo: UserRepository,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self { repo, franchise_repo, user_repo, dispatcher }
    }

    /// Reserva vinda do formulário público: o status é SEMPRE forçado a
    /// PENDING, ignorando o que o visitante tenha mandado.
    pub async fn create_public<'e, E>(
        &self,
        executor: E,
        input: CreateReservationInput,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.create(executor, input.normalized_for_public(), PUBLIC_PRINCIPAL, true)
            .await
    }

    /// Reserva criada pela equipe: qualquer status inicial.
    pub async fn create_staff<'e, E>(
        &self,
        executor: E,
        input: CreateReservationInput,
        principal: &User,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.create(executor, input, &principal.email, false).await
    }

    async fn create<'e, E>(
        &self,
        executor: E,
        input: CreateReservationInput,
        principal: &str,
        require_active: bool,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let franchise = self
            .franchise_repo
            .resolve(&mut *tx, &input.franchise)
            .await?
            .ok_or(AppError::FranchiseNotFound)?;

        if require_active && !franchise.active {
            return Err(AppError::FranchiseNotFound);
        }

        let reservation = self
            .repo
            .insert(
                &mut *tx,
                &NewReservation {
                    // Sempre o display_name atual, mantendo o invariante do
                    // nome denormalizado.
                    franchise_name: &franchise.display_name,
                    customer_name: &input.customer_name,
                    phone: &input.phone,
                    date_time: timezone::local_to_utc(input.local_date_time),
                    people: input.people,
                    birthday: input.birthday,
                    birthday_person_name: input.birthday_person_name.as_deref(),
                    characters: input.characters.as_deref(),
                    status: input.status,
                    created_by: principal,
                },
            )
            .await?;

        tx.commit().await?;

        // Fire-and-forget: a falha do webhook é logada e nunca desfaz a
        // reserva nem chega ao cliente.
        if let Some(webhook_url) = franchise.webhook_url {
            let dispatcher = self.dispatcher.clone();
            let snapshot = reservation.clone();
            tokio::spawn(async move {
                if let Err(e) = dispatcher
                    .notify_new_reservation(&webhook_url, &snapshot)
                    .await
                {
                    tracing::warn!(
                        "Falha ao notificar o webhook da franquia '{}': {}",
                        snapshot.franchise_name,
                        e
                    );
                }
            });
        }

        Ok(reservation)
    }

    /// Atualização parcial, com a máquina de estados imposta no servidor:
    /// mudança de status fora das transições permitidas vira 409.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: UpdateReservationInput,
        principal: &User,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if let Some(next) = input.status {
            if !current.status.can_transition_to(next) {
                return Err(AppError::InvalidStatusTransition(
                    current.status.as_str().to_string(),
                    next.as_str().to_string(),
                ));
            }
        }

        let reservation = self
            .repo
            .update(
                &mut *tx,
                id,
                &ReservationChanges {
                    customer_name: input.customer_name.as_deref(),
                    phone: input.phone.as_deref(),
                    date_time: input.local_date_time.map(timezone::local_to_utc),
                    people: input.people,
                    birthday: input.birthday,
                    birthday_person_name: input.birthday_person_name.as_deref(),
                    characters: input.characters.as_deref(),
                    status: input.status,
                },
                &principal.email,
            )
            .await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Aprovar/confirmar/cancelar: atualização só de status.
    pub async fn transition<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        next: ReservationStatus,
        principal: &User,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.update(
            executor,
            id,
            UpdateReservationInput { status: Some(next), ..Default::default() },
            principal,
        )
        .await
    }

    /// Exclusão definitiva, irreversível.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete(executor, id).await
    }

    /// Listagem do painel. Não-superadmins só enxergam as franquias às quais
    /// estão vinculados, qualquer que seja o filtro pedido.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        franchise_name: Option<String>,
        date: Option<NaiveDate>,
        status: Option<ReservationStatus>,
        principal: &User,
    ) -> Result<Vec<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let allowed_franchises = match principal.role {
            Role::Superadmin => None,
            _ => {
                let bindings = self
                    .user_repo
                    .list_bindings_for_user(&mut *conn, principal.id)
                    .await?;
                Some(bindings.into_iter().map(|b| b.franchise_name).collect())
            }
        };

        let filter = ReservationFilter {
            franchise_name,
            window: date.map(timezone::local_day_bounds),
            status,
            allowed_franchises,
        };

        self.repo.list(&mut *conn, &filter).await
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::ReservationNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_input(status: ReservationStatus) -> CreateReservationInput {
        CreateReservationInput {
            franchise: "Central".to_string(),
            customer_name: "João Pereira".to_string(),
            phone: "+5511999990000".to_string(),
            local_date_time: NaiveDate::from_ymd_opt(2024, 6, 25)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            people: 2,
            birthday: false,
            birthday_person_name: None,
            characters: None,
            status,
        }
    }

    #[test]
    fn formulario_publico_forca_status_pending() {
        for requested in [
            ReservationStatus::Pending,
            ReservationStatus::Approved,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
        ] {
            let input = sample_input(requested).normalized_for_public();
            assert_eq!(input.status, ReservationStatus::Pending);
        }
    }

    #[test]
    fn normalizacao_nao_toca_os_demais_campos() {
        let input = sample_input(ReservationStatus::Confirmed).normalized_for_public();
        assert_eq!(input.franchise, "Central");
        assert_eq!(input.people, 2);
    }
}
