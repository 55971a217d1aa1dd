//! User table as a JSON object keyed by account id

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use super::file_store::JsonFile;
use crate::domain::user::default_admin_account;
use crate::domain::{
    DomainError, DomainResult, PermissionSet, UserAccount, UserRecord, UserRepositoryInterface,
};

type UserTable = BTreeMap<String, UserRecord>;

fn seed_table() -> UserTable {
    let admin = default_admin_account();
    UserTable::from([(admin.id, admin.record)])
}

pub struct JsonUserRepository {
    file: JsonFile<UserTable>,
}

impl JsonUserRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    async fn table(&self) -> DomainResult<UserTable> {
        Ok(self.file.read_or_init(seed_table).await?.0)
    }

    async fn modify(
        &self,
        id: &str,
        f: impl FnOnce(&mut UserRecord),
    ) -> DomainResult<Option<UserAccount>> {
        self.file
            .update(seed_table, |table| {
                Ok(table.get_mut(id).map(|record| {
                    f(record);
                    UserAccount::new(id, record.clone())
                }))
            })
            .await
    }
}

#[async_trait]
impl UserRepositoryInterface for JsonUserRepository {
    async fn ensure_initialized(&self) -> DomainResult<bool> {
        let (_, created) = self.file.read_or_init(seed_table).await?;
        if created {
            info!(path = %self.file.path().display(), "User table created with default admin account");
        }
        Ok(created)
    }

    async fn list_accounts(&self) -> DomainResult<Vec<UserAccount>> {
        Ok(self
            .table()
            .await?
            .into_iter()
            .map(|(id, record)| UserAccount::new(id, record))
            .collect())
    }

    async fn get_account(&self, id: &str) -> DomainResult<Option<UserAccount>> {
        Ok(self
            .table()
            .await?
            .remove(id)
            .map(|record| UserAccount::new(id, record)))
    }

    async fn insert_account(&self, account: UserAccount) -> DomainResult<()> {
        self.file
            .update(seed_table, |table| {
                if table.contains_key(&account.id) {
                    return Err(DomainError::DuplicateAccount(account.id.clone()));
                }
                table.insert(account.id, account.record);
                Ok(())
            })
            .await
    }

    async fn update_permissions(
        &self,
        id: &str,
        perms: PermissionSet,
    ) -> DomainResult<Option<UserAccount>> {
        self.modify(id, |record| record.perms = perms).await
    }

    async fn update_password(&self, id: &str, password: &str) -> DomainResult<Option<UserAccount>> {
        let password = password.to_string();
        self.modify(id, |record| record.password = password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Permission, UserRole};
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> JsonUserRepository {
        JsonUserRepository::new(dir.path().join("users.json"))
    }

    #[tokio::test]
    async fn first_access_seeds_admin() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        assert!(repo.ensure_initialized().await.unwrap());
        assert!(!repo.ensure_initialized().await.unwrap());

        let admin = repo.get_account("admin").await.unwrap().unwrap();
        assert!(admin.password_matches("123"));
        assert!(admin.record.perms.is_empty());
    }

    #[tokio::test]
    async fn legacy_field_names_are_read() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("users.json"),
            r#"{"nurse":{"password":"pw","name":"N","role":"staff","permissions":["file-library","admin-panal"]}}"#,
        )
        .unwrap();
        let nurse = repo(&dir).get_account("nurse").await.unwrap().unwrap();
        assert!(nurse.record.perms.contains(Permission::FileLibrary));
        assert!(nurse.record.perms.contains(Permission::AdminPanel));
        assert_eq!(nurse.record.role, UserRole::Staff);
    }

    #[tokio::test]
    async fn unknown_permission_tag_does_not_lock_out_accounts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("users.json"),
            r#"{"admin":{"password":"123","name":"A","role":"admin","permissions":["admin-panel"]},
               "nurse":{"password":"pw","name":"N","role":"staff","permissions":["reports","core-files"]}}"#,
        )
        .unwrap();
        let repo = repo(&dir);
        assert!(repo.get_account("admin").await.unwrap().unwrap().password_matches("123"));
        let nurse = repo.get_account("nurse").await.unwrap().unwrap();
        assert_eq!(nurse.record.perms.to_vec(), vec![Permission::CoreFiles]);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected_and_table_unchanged() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let account = UserAccount::new(
            "admin",
            UserRecord {
                password: "other".into(),
                name: String::new(),
                role: UserRole::Staff,
                perms: PermissionSet::new(),
            },
        );
        let err = repo.insert_account(account).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateAccount(id) if id == "admin"));
        assert!(repo.get_account("admin").await.unwrap().unwrap().password_matches("123"));
    }

    #[tokio::test]
    async fn updates_persist_and_unknown_id_is_none() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let perms: PermissionSet = vec![Permission::AssetRecords].into();
        let updated = repo.update_permissions("admin", perms.clone()).await.unwrap().unwrap();
        assert_eq!(updated.record.perms, perms);
        repo.update_password("admin", "new").await.unwrap();

        let reread = JsonUserRepository::new(dir.path().join("users.json"));
        let admin = reread.get_account("admin").await.unwrap().unwrap();
        assert!(admin.password_matches("new"));
        assert_eq!(admin.record.perms, perms);

        assert!(repo.update_password("ghost", "x").await.unwrap().is_none());
    }
}
