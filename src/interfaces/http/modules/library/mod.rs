//! Library module - public and core work files

pub mod handlers;

pub use handlers::*;
