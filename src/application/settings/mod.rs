pub mod service;

pub use service::{sniff_image_type, Logo, SettingsService};
