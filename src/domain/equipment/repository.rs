use async_trait::async_trait;

use super::{EquipmentTable, SourceFrame};
use crate::domain::DomainResult;

/// Receives the stored table (or the load error) and returns the table to
/// write. An `Err` aborts the write.
pub type TableUpdate =
    Box<dyn FnOnce(DomainResult<EquipmentTable>) -> DomainResult<EquipmentTable> + Send>;

/// Equipment table file access.
#[async_trait]
pub trait EquipmentRepositoryInterface: Send + Sync {
    /// Whole-table read. `FileNotFound` when the table was never initialized.
    async fn load(&self) -> DomainResult<EquipmentTable>;

    /// Locked read-modify-write; returns the table as written.
    async fn update(&self, f: TableUpdate) -> DomainResult<EquipmentTable>;
}

/// Reads the numbered external sheets the import reconciler merges.
#[async_trait]
pub trait ImportSourceProvider: Send + Sync {
    /// Present sources in numeric order; absent files are skipped.
    async fn load_sources(&self) -> DomainResult<Vec<SourceFrame>>;
}
