//! Domain layer: entities, rules and repository interfaces.

pub mod equipment;
pub mod library;
pub mod repair;
pub mod session;
pub mod settings;
pub mod user;

pub use equipment::{
    AgeBuckets, AssetMetrics, DepartmentGroup, EquipmentRecord, EquipmentRepositoryInterface,
    EquipmentStatus, EquipmentTable, GridEdit, ImportSourceProvider, SourceFrame,
};
pub use library::{FileKind, LibraryFile, LibraryStore, LibraryZone};
pub use repair::{RepairRepositoryInterface, RepairRequest, RepairTicket};
pub use session::{build_menu, MenuEntry, Session};
pub use settings::{SettingsRepositoryInterface, SettingsUpdate, SiteSettings};
pub use user::{
    CreateAccountDto, Permission, PermissionSet, UserAccount, UserRecord, UserRepositoryInterface,
    UserRole,
};

pub use crate::shared::errors::{DomainError, DomainResult};
