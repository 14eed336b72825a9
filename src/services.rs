pub mod auth;
pub mod availability;
pub mod franchise_service;
pub mod message_service;
pub mod notification;
pub mod reservation_service;
pub mod user_service;
