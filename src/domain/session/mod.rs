//! Session model and navigation gate

pub mod model;
pub mod navigation;

pub use model::Session;
pub use navigation::{build_menu, select_view, MenuEntry};
