//! User aggregate
//!
//! Account records, the permission model and the repository interface.

pub mod model;
pub mod permission;
pub mod repository;

mod dto_create;

pub use model::{
    default_admin_account, effective_permissions, UserAccount, UserRecord, UserRole,
    RESERVED_ADMIN_ID,
};
pub use permission::{Permission, PermissionSet};

pub use dto_create::CreateAccountDto;

pub use repository::UserRepositoryInterface;
