//! Application layer - use-case orchestration over the domain

pub mod assets;
pub mod identity;
pub mod import;
pub mod library;
pub mod repairs;
pub mod session;
pub mod settings;

pub use assets::{AssetOverview, AssetService};
pub use identity::UserService;
pub use import::{ImportOutcome, ImportService};
pub use library::{LibraryListing, LibraryService};
pub use repairs::RepairService;
pub use session::{LoginResult, ResolvedSession, SessionRegistry, SessionService, SharedSessionRegistry};
pub use settings::{Logo, SettingsService};
