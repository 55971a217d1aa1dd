//! HTTP feature modules, one per area of the portal

pub mod account;
pub mod admin;
pub mod assets;
pub mod auth;
pub mod health;
pub mod library;
pub mod metrics;
pub mod navigation;
pub mod repairs;
pub mod request_id;
pub mod settings;
