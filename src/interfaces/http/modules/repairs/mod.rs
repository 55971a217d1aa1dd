//! Repairs module - ticket intake and listing

pub mod handlers;

pub use handlers::*;
