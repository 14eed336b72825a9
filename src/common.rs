pub mod error;
pub mod timezone;
