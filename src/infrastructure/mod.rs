//! Infrastructure layer - flat files and token signing

pub mod crypto;
pub mod storage;

pub use crypto::{SessionClaims, TokenConfig};
pub use storage::{
    CsvEquipmentRepository, CsvImportSources, FsLibraryStore, JsonRepairRepository,
    JsonSettingsRepository, JsonUserRepository,
};
