//! Flat-file persistence

pub mod csv_codec;
pub mod equipment;
pub mod file_store;
pub mod import_sources;
pub mod library;
pub mod repairs;
pub mod settings;
pub mod users;

pub use equipment::CsvEquipmentRepository;
pub use file_store::{write_atomic, JsonFile};
pub use import_sources::CsvImportSources;
pub use library::FsLibraryStore;
pub use repairs::JsonRepairRepository;
pub use settings::JsonSettingsRepository;
pub use users::JsonUserRepository;
