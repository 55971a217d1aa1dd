//! Settings module - public read side of the site settings

pub mod handlers;

pub use handlers::*;
