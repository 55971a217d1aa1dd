//! Assets module - equipment registry, grid edits and import

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
