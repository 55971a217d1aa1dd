//! Account management - application-layer orchestration
//!
//! Login checks, admin account edits and self-service password change.
//! HTTP handlers delegate here.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    CreateAccountDto, DomainError, DomainResult, PermissionSet, UserAccount, UserRecord,
    UserRepositoryInterface, UserRole,
};

/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer.
pub struct UserService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    default_permissions: PermissionSet,
}

impl<R: UserRepositoryInterface> UserService<R> {
    pub fn new(repo: Arc<R>, default_permissions: PermissionSet) -> Self {
        Self {
            repo,
            default_permissions,
        }
    }

    /// Seed the table with the default admin if it does not exist yet.
    pub async fn ensure_initialized(&self) -> DomainResult<bool> {
        let created = self.repo.ensure_initialized().await?;
        if created {
            warn!("Default account 'admin' with password '123' was created; change it from the admin panel");
        }
        Ok(created)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Exact, case-sensitive id and password match.
    pub async fn authenticate(&self, id: &str, password: &str) -> DomainResult<UserAccount> {
        match self.repo.get_account(id).await? {
            Some(account) if account.password_matches(password) => Ok(account),
            _ => Err(DomainError::InvalidCredentials),
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_accounts(&self) -> DomainResult<Vec<UserAccount>> {
        self.repo.list_accounts().await
    }

    pub async fn get_account(&self, id: &str) -> DomainResult<Option<UserAccount>> {
        self.repo.get_account(id).await
    }

    // ── Admin panel ─────────────────────────────────────────────

    pub async fn create_account(&self, dto: CreateAccountDto) -> DomainResult<UserAccount> {
        let id = dto.id.trim();
        if id.is_empty() {
            return Err(DomainError::EmptyAccountId);
        }
        if dto.password.is_empty() {
            return Err(DomainError::EmptyPassword);
        }

        let account = UserAccount::new(
            id,
            UserRecord {
                password: dto.password,
                name: dto.name.trim().to_string(),
                role: dto.role.unwrap_or(UserRole::Staff),
                perms: self.default_permissions.clone(),
            },
        );
        self.repo.insert_account(account.clone()).await?;

        info!(account_id = %account.id, role = %account.record.role, "Account created");
        Ok(account)
    }

    /// Overwrite the stored permission set wholesale.
    pub async fn set_permissions(&self, id: &str, perms: PermissionSet) -> DomainResult<UserAccount> {
        let account = self
            .repo
            .update_permissions(id, perms)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(account_id = %id, perms = ?account.record.perms.to_vec(), "Permissions updated");
        Ok(account)
    }

    pub async fn reset_password(&self, id: &str, password: &str) -> DomainResult<UserAccount> {
        if password.is_empty() {
            return Err(DomainError::EmptyPassword);
        }
        let account = self
            .repo
            .update_password(id, password)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(account_id = %id, "Password reset by admin");
        Ok(account)
    }

    // ── Personal settings ───────────────────────────────────────

    pub async fn change_own_password(&self, id: &str, new_password: &str) -> DomainResult<()> {
        if new_password.is_empty() {
            return Err(DomainError::EmptyPassword);
        }
        self.repo
            .update_password(id, new_password)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(account_id = %id, "Password changed");
        Ok(())
    }
}

fn not_found(id: &str) -> DomainError {
    DomainError::NotFound {
        entity: "Account",
        field: "id",
        value: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Permission;
    use crate::infrastructure::JsonUserRepository;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> UserService<JsonUserRepository> {
        UserService::new(
            Arc::new(JsonUserRepository::new(dir.path().join("users.json"))),
            PermissionSet::new(),
        )
    }

    fn dto(id: &str, password: &str) -> CreateAccountDto {
        CreateAccountDto {
            id: id.into(),
            name: "Tech".into(),
            password: password.into(),
            role: None,
        }
    }

    #[tokio::test]
    async fn authenticate_is_exact() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        assert!(svc.authenticate("admin", "123").await.is_ok());
        assert!(matches!(svc.authenticate("admin", "123 ").await, Err(DomainError::InvalidCredentials)));
        assert!(matches!(svc.authenticate("Admin", "123").await, Err(DomainError::InvalidCredentials)));
        assert!(matches!(svc.authenticate("ghost", "").await, Err(DomainError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn create_account_rules() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);

        let created = svc.create_account(dto("  tech1 ", "pw")).await.unwrap();
        assert_eq!(created.id, "tech1");
        assert!(created.record.perms.is_empty());

        assert!(matches!(svc.create_account(dto("   ", "pw")).await, Err(DomainError::EmptyAccountId)));
        assert!(matches!(svc.create_account(dto("tech2", "")).await, Err(DomainError::EmptyPassword)));
        assert!(matches!(
            svc.create_account(dto("tech1", "other")).await,
            Err(DomainError::DuplicateAccount(_))
        ));
        assert!(svc.authenticate("tech1", "pw").await.is_ok());
    }

    #[tokio::test]
    async fn configured_default_permissions_apply_to_new_accounts() {
        let dir = TempDir::new().unwrap();
        let svc = UserService::new(
            Arc::new(JsonUserRepository::new(dir.path().join("users.json"))),
            vec![Permission::FileLibrary].into(),
        );
        let created = svc.create_account(dto("tech1", "pw")).await.unwrap();
        assert!(created.record.perms.contains(Permission::FileLibrary));
    }

    #[tokio::test]
    async fn permission_and_password_edits() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        svc.create_account(dto("tech1", "pw")).await.unwrap();

        let perms: PermissionSet = vec![Permission::AssetRecords, Permission::CoreFiles].into();
        assert_eq!(svc.set_permissions("tech1", perms.clone()).await.unwrap().record.perms, perms);
        assert!(matches!(
            svc.set_permissions("ghost", perms).await,
            Err(DomainError::NotFound { .. })
        ));

        assert!(matches!(svc.reset_password("tech1", "").await, Err(DomainError::EmptyPassword)));
        svc.reset_password("tech1", "fresh").await.unwrap();
        assert!(svc.authenticate("tech1", "fresh").await.is_ok());

        assert!(matches!(svc.change_own_password("tech1", "").await, Err(DomainError::EmptyPassword)));
        svc.change_own_password("tech1", "mine").await.unwrap();
        assert!(svc.authenticate("tech1", "fresh").await.is_err());
        assert!(svc.authenticate("tech1", "mine").await.is_ok());
    }
}
