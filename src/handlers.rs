pub mod auth;
pub mod franchises;
pub mod messages;
pub mod public;
pub mod reservations;
pub mod users;
