//! Navigation module - menu and active view

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
