//! Admin module - site settings, accounts, permissions, passwords

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
