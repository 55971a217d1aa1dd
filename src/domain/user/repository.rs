use async_trait::async_trait;

use super::{PermissionSet, UserAccount};
use crate::domain::DomainResult;

/// User table access. Implementations read the whole table per call.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Create the table with the default admin account if it is missing.
    async fn ensure_initialized(&self) -> DomainResult<bool>;

    async fn list_accounts(&self) -> DomainResult<Vec<UserAccount>>;
    async fn get_account(&self, id: &str) -> DomainResult<Option<UserAccount>>;

    /// Fails with `DuplicateAccount` when the id is taken.
    async fn insert_account(&self, account: UserAccount) -> DomainResult<()>;

    async fn update_permissions(&self, id: &str, perms: PermissionSet) -> DomainResult<Option<UserAccount>>;
    async fn update_password(&self, id: &str, password: &str) -> DomainResult<Option<UserAccount>>;
}
