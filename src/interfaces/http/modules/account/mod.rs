//! Account module - self-service password change

pub mod handlers;

pub use handlers::*;
