pub mod auth;
pub mod franchise;
pub mod message;
pub mod rbac;
pub mod reservation;
