//! File library access with zone gating

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{DomainResult, LibraryFile, LibraryStore, LibraryZone, Permission, Session};

/// Listing of the zones visible to one session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryListing {
    pub public: Vec<LibraryFile>,
    /// `None` when the session may not see the core zone
    pub core: Option<Vec<LibraryFile>>,
}

pub struct LibraryService {
    store: Arc<dyn LibraryStore>,
}

impl LibraryService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    fn check_zone(session: &Session, zone: LibraryZone) -> DomainResult<()> {
        session.require(Permission::FileLibrary)?;
        if let Some(extra) = zone.extra_permission() {
            session.require(extra)?;
        }
        Ok(())
    }

    pub async fn list(&self, session: &Session) -> DomainResult<LibraryListing> {
        session.require(Permission::FileLibrary)?;
        let public = self.store.list(LibraryZone::Public).await?;
        let core = if Self::check_zone(session, LibraryZone::Core).is_ok() {
            Some(self.store.list(LibraryZone::Core).await?)
        } else {
            None
        };
        Ok(LibraryListing { public, core })
    }

    pub async fn download(&self, session: &Session, zone: LibraryZone, name: &str) -> DomainResult<Vec<u8>> {
        Self::check_zone(session, zone)?;
        let bytes = self.store.read(zone, name).await?;
        info!(account_id = %session.user_id, zone = zone.as_str(), file = %name, "Library file downloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LibraryConfig;
    use crate::domain::{DomainError, UserAccount, UserRecord, UserRole};
    use crate::infrastructure::FsLibraryStore;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> LibraryService {
        let config = LibraryConfig {
            public_dir: dir.path().join("public"),
            core_dir: dir.path().join("core"),
        };
        std::fs::create_dir_all(&config.public_dir).unwrap();
        std::fs::create_dir_all(&config.core_dir).unwrap();
        std::fs::write(config.public_dir.join("guide.pdf"), b"g").unwrap();
        std::fs::write(config.core_dir.join("budget.xlsx"), b"b").unwrap();
        LibraryService::new(Arc::new(FsLibraryStore::new(&config)))
    }

    fn staff(perms: Vec<Permission>) -> Session {
        Session::from_account(&UserAccount::new(
            "u1",
            UserRecord {
                password: "pw".into(),
                name: String::new(),
                role: UserRole::Staff,
                perms: perms.into(),
            },
        ))
    }

    #[tokio::test]
    async fn core_zone_hidden_without_core_files() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let listing = svc.list(&staff(vec![Permission::FileLibrary])).await.unwrap();
        assert_eq!(listing.public.len(), 1);
        assert!(listing.core.is_none());

        let err = svc
            .download(&staff(vec![Permission::FileLibrary]), LibraryZone::Core, "budget.xlsx")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn core_files_permission_opens_core_zone() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let session = staff(vec![Permission::FileLibrary, Permission::CoreFiles]);
        let listing = svc.list(&session).await.unwrap();
        assert_eq!(listing.core.unwrap()[0].name, "budget.xlsx");
        assert_eq!(svc.download(&session, LibraryZone::Core, "budget.xlsx").await.unwrap(), b"b");
    }

    #[tokio::test]
    async fn library_requires_file_library_and_login() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        assert!(matches!(svc.list(&staff(vec![])).await, Err(DomainError::Forbidden(_))));
        assert!(matches!(svc.list(&Session::anonymous()).await, Err(DomainError::Unauthorized(_))));
    }
}
