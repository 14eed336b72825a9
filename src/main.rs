// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Superfície pública da página /reserva/{slug}: sem token
    let public_routes = Router::new()
        .route("/franchises", get(handlers::public::list_active_franchises))
        .route("/franchises/{term}", get(handlers::public::resolve_franchise))
        .route("/availability", get(handlers::public::availability))
        .route("/reservations", post(handlers::public::create_public_reservation));

    // Webhook de entrada do provedor de mensagens (sem token)
    let webhook_routes = Router::new()
        .route("/messages", post(handlers::messages::inbound_message));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/franchises", get(handlers::auth::get_my_franchises))
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/{id}",
            axum::routing::patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/{id}/franchises",
            get(handlers::users::list_user_franchises).post(handlers::users::assign_franchise),
        )
        .route(
            "/{id}/franchises/{franchise_id}",
            axum::routing::delete(handlers::users::unassign_franchise),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let reservation_routes = Router::new()
        .route(
            "/",
            post(handlers::reservations::create_reservation)
                .get(handlers::reservations::list_reservations),
        )
        .route(
            "/{id}",
            get(handlers::reservations::get_reservation)
                .patch(handlers::reservations::update_reservation)
                .delete(handlers::reservations::delete_reservation),
        )
        .route(
            "/{id}/status",
            axum::routing::patch(handlers::reservations::transition_reservation),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let franchise_routes = Router::new()
        .route(
            "/",
            post(handlers::franchises::create_franchise)
                .get(handlers::franchises::list_franchises),
        )
        .route(
            "/{id}",
            get(handlers::franchises::get_franchise)
                .patch(handlers::franchises::update_franchise),
        )
        .route(
            "/{id}/active",
            axum::routing::patch(handlers::franchises::set_franchise_active),
        )
        .route("/{id}/chats", get(handlers::messages::list_chats))
        .route("/{id}/chats/{chat_id}", get(handlers::messages::list_messages))
        .route("/{id}/messages", post(handlers::messages::send_message))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/public", public_routes)
        .nest("/api/webhooks", webhook_routes)
        .nest("/api/users", user_routes)
        .nest("/api/reservations", reservation_routes)
        .nest("/api/franchises", franchise_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state.clone());

    // Inicia o servidor
    let listener = TcpListener::bind(&app_state.bind_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!(
        "🚀 Servidor escutando em {}",
        listener.local_addr().expect("endereço local disponível")
    );
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
