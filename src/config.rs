// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{FranchiseRepository, MessageRepository, ReservationRepository, UserRepository},
    services::{
        auth::AuthService,
        availability::AvailabilityService,
        franchise_service::FranchiseService,
        message_service::MessageService,
        notification::NotificationDispatcher,
        reservation_service::ReservationService,
        user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub bind_addr: String,

    pub auth_service: AuthService,
    pub user_service: UserService,
    pub franchise_service: FranchiseService,
    pub availability_service: AvailabilityService,
    pub reservation_service: ReservationService,
    pub message_service: MessageService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let http_client = reqwest::Client::new();
        let dispatcher = NotificationDispatcher::new(http_client);

        let user_repo = UserRepository::new();
        let franchise_repo = FranchiseRepository::new();
        let reservation_repo = ReservationRepository::new();
        let message_repo = MessageRepository::new();

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret, db_pool.clone());
        let user_service = UserService::new(user_repo.clone(), franchise_repo.clone());
        let franchise_service = FranchiseService::new(franchise_repo.clone());
        let availability_service = AvailabilityService::new(reservation_repo.clone());
        let reservation_service = ReservationService::new(
            reservation_repo,
            franchise_repo.clone(),
            user_repo,
            dispatcher.clone(),
        );
        let message_service = MessageService::new(message_repo, franchise_repo, dispatcher);

        Ok(Self {
            db_pool,
            bind_addr,
            auth_service,
            user_service,
            franchise_service,
            availability_service,
            reservation_service,
            message_service,
        })
    }
}
