// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::get_my_franchises,

        // --- Public ---
        handlers::public::list_active_franchises,
        handlers::public::resolve_franchise,
        handlers::public::availability,
        handlers::public::create_public_reservation,

        // --- Reservations ---
        handlers::reservations::create_reservation,
        handlers::reservations::list_reservations,
        handlers::reservations::get_reservation,
        handlers::reservations::update_reservation,
        handlers::reservations::transition_reservation,
        handlers::reservations::delete_reservation,

        // --- Franchises ---
        handlers::franchises::create_franchise,
        handlers::franchises::list_franchises,
        handlers::franchises::get_franchise,
        handlers::franchises::update_franchise,
        handlers::franchises::set_franchise_active,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::list_user_franchises,
        handlers::users::assign_franchise,
        handlers::users::unassign_franchise,

        // --- Messages ---
        handlers::messages::inbound_message,
        handlers::messages::list_chats,
        handlers::messages::list_messages,
        handlers::messages::send_message,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::rbac::Role,
            models::rbac::Capability,

            // --- Franchises ---
            models::franchise::Franchise,
            models::franchise::UserFranchise,
            models::franchise::RenameCascadeReport,
            handlers::franchises::CreateFranchisePayload,
            handlers::franchises::UpdateFranchisePayload,
            handlers::franchises::SetActivePayload,
            handlers::franchises::UpdateFranchiseResponse,

            // --- Reservations ---
            models::reservation::Reservation,
            models::reservation::ReservationStatus,
            models::reservation::TimeSlot,
            handlers::reservations::CreateReservationPayload,
            handlers::reservations::UpdateReservationPayload,
            handlers::reservations::TransitionPayload,

            // --- Users ---
            handlers::users::CreateUserPayload,
            handlers::users::UpdateUserPayload,
            handlers::users::AssignFranchisePayload,

            // --- Messages ---
            models::message::Message,
            models::message::MessageDirection,
            models::message::ChatSummary,
            handlers::messages::InboundMessagePayload,
            handlers::messages::SendMessagePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Public", description = "Página pública de reservas (sem token)"),
        (name = "Reservations", description = "Ciclo de vida das reservas"),
        (name = "Franchises", description = "Gestão de Franquias"),
        (name = "Users", description = "Gestão de Usuários e Vínculos"),
        (name = "Messages", description = "Inbox de mensagens (WhatsApp)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
