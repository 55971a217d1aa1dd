//! Whole-file JSON persistence with atomic replace
//!
//! Every write goes to a sibling temp file, is fsynced and then renamed
//! over the target. One async mutex per file serializes read-modify-write
//! sequences.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::DomainResult;
use crate::shared::InfraError;

/// Replace `path` with `bytes` atomically, creating parent directories.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), InfraError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| InfraError::io(parent, e))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4().simple()));

    let result = async {
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| InfraError::io(&tmp, e))?;
        file.write_all(bytes).await.map_err(|e| InfraError::io(&tmp, e))?;
        file.sync_all().await.map_err(|e| InfraError::io(&tmp, e))?;
        drop(file);
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| InfraError::io(path, e))
    }
    .await;

    match &result {
        Ok(()) => debug!(path = %path.display(), bytes = bytes.len(), "File replaced"),
        Err(_) => {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
    }
    result
}

/// Read the whole file; `Ok(None)` when it does not exist.
pub async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, InfraError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(InfraError::io(path, e)),
    }
}

/// One JSON document on disk with a single writer.
pub struct JsonFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, InfraError> {
        serde_json::from_slice(bytes).map_err(|e| InfraError::malformed(&self.path, e.to_string()))
    }

    async fn write(&self, value: &T) -> Result<(), InfraError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        write_atomic(&self.path, &bytes).await
    }

    async fn load_unlocked(&self, init: impl FnOnce() -> T) -> Result<(T, bool), InfraError> {
        match read_optional(&self.path).await? {
            Some(bytes) => Ok((self.decode(&bytes)?, false)),
            None => {
                let value = init();
                self.write(&value).await?;
                Ok((value, true))
            }
        }
    }

    /// Current contents, writing `init()` first if the file is absent.
    /// The flag is `true` when the file was created by this call.
    pub async fn read_or_init(&self, init: impl FnOnce() -> T) -> Result<(T, bool), InfraError> {
        let _guard = self.lock.lock().await;
        self.load_unlocked(init).await
    }

    /// Current contents without creating the file.
    pub async fn read(&self) -> Result<Option<T>, InfraError> {
        match read_optional(&self.path).await? {
            Some(bytes) => Ok(Some(self.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load (or init), let `f` change the value, then write it back.
    /// Nothing is written when `f` fails.
    pub async fn update<R>(
        &self,
        init: impl FnOnce() -> T,
        f: impl FnOnce(&mut T) -> DomainResult<R>,
    ) -> DomainResult<R> {
        let _guard = self.lock.lock().await;
        let (mut value, _) = self.load_unlocked(init).await?;
        let out = f(&mut value)?;
        self.write(&value).await?;
        Ok(out)
    }
}
