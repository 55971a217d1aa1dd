//! Site settings record and its repository interface

pub mod model;

use async_trait::async_trait;

pub use model::{SettingsUpdate, SiteSettings};

use crate::domain::DomainResult;

/// In-place change applied under the store's lock.
pub type SettingsChange = Box<dyn FnOnce(&mut SiteSettings) + Send>;

#[async_trait]
pub trait SettingsRepositoryInterface: Send + Sync {
    /// Load the record, writing defaults first if the file is absent.
    async fn load(&self) -> DomainResult<SiteSettings>;

    /// Locked read-modify-write; returns the record as written.
    async fn update(&self, change: SettingsChange) -> DomainResult<SiteSettings>;
}
