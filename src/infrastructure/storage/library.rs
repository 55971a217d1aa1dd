//! Work-file library on the local filesystem

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::config::LibraryConfig;
use crate::domain::library::validate_file_name;
use crate::domain::{DomainResult, FileKind, LibraryFile, LibraryStore, LibraryZone};
use crate::shared::InfraError;

pub struct FsLibraryStore {
    public_dir: PathBuf,
    core_dir: PathBuf,
}

impl FsLibraryStore {
    pub fn new(config: &LibraryConfig) -> Self {
        Self {
            public_dir: config.public_dir.clone(),
            core_dir: config.core_dir.clone(),
        }
    }

    fn zone_dir(&self, zone: LibraryZone) -> &PathBuf {
        match zone {
            LibraryZone::Public => &self.public_dir,
            LibraryZone::Core => &self.core_dir,
        }
    }
}

#[async_trait]
impl LibraryStore for FsLibraryStore {
    async fn list(&self, zone: LibraryZone) -> DomainResult<Vec<LibraryFile>> {
        let dir = self.zone_dir(zone);
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| InfraError::io(dir, e))?;

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| InfraError::io(dir, e))?;
        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| InfraError::io(dir, e))?
        {
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| InfraError::io(entry.path(), e))?;
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(LibraryFile {
                kind: FileKind::from_name(&name),
                size_bytes: metadata.len(),
                name,
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(zone = zone.as_str(), count = files.len(), "Library zone listed");
        Ok(files)
    }

    async fn read(&self, zone: LibraryZone, name: &str) -> DomainResult<Vec<u8>> {
        validate_file_name(name)?;
        let path = self.zone_dir(zone).join(name);
        Ok(tokio::fs::read(&path)
            .await
            .map_err(|e| InfraError::io(&path, e))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FsLibraryStore {
        FsLibraryStore::new(&LibraryConfig {
            public_dir: dir.path().join("public"),
            core_dir: dir.path().join("core"),
        })
    }

    #[tokio::test]
    async fn missing_zone_is_created_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).list(LibraryZone::Core).await.unwrap().is_empty());
        assert!(dir.path().join("core").is_dir());
    }

    #[tokio::test]
    async fn lists_files_sorted_with_kind_and_size() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("public");
        std::fs::create_dir_all(public.join("subdir")).unwrap();
        std::fs::write(public.join("b.xlsx"), b"12345").unwrap();
        std::fs::write(public.join("a.pdf"), b"1").unwrap();

        let files = store(&dir).list(LibraryZone::Public).await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "a.pdf");
        assert_eq!(files[0].kind, FileKind::Pdf);
        assert_eq!(files[1].size_bytes, 5);
        assert_eq!(files[1].kind, FileKind::Spreadsheet);
    }

    #[tokio::test]
    async fn read_rejects_traversal_and_reports_missing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::create_dir_all(dir.path().join("core")).unwrap();
        std::fs::write(dir.path().join("core/secret.pdf"), b"s").unwrap();

        assert!(matches!(
            store.read(LibraryZone::Public, "../core/secret.pdf").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            store.read(LibraryZone::Public, "nope.pdf").await,
            Err(DomainError::FileNotFound(_))
        ));
        assert_eq!(store.read(LibraryZone::Core, "secret.pdf").await.unwrap(), b"s");
    }
}
