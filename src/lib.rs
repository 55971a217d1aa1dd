//! # Medical Equipment Portal
//!
//! Back end for a hospital medical-equipment department: a login-gated
//! portal over a CSV asset registry, repair intake and a file library.
//!
//! ## Architecture
//!
//! - **domain**: entities, permission rules, repository interfaces
//! - **application**: use-case services (identity, sessions, assets, import, ...)
//! - **infrastructure**: flat-file storage and session token signing
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: service wiring and server lifecycle

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use interfaces::http::create_api_router;
pub use server::{AppServices, ServerHandle};
