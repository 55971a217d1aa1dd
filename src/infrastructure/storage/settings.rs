//! Site settings JSON file

use std::path::PathBuf;

use async_trait::async_trait;

use super::file_store::JsonFile;
use crate::domain::settings::SettingsChange;
use crate::domain::{DomainResult, SettingsRepositoryInterface, SiteSettings};

pub struct JsonSettingsRepository {
    file: JsonFile<SiteSettings>,
}

impl JsonSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

#[async_trait]
impl SettingsRepositoryInterface for JsonSettingsRepository {
    async fn load(&self) -> DomainResult<SiteSettings> {
        Ok(self.file.read_or_init(SiteSettings::default).await?.0)
    }

    async fn update(&self, change: SettingsChange) -> DomainResult<SiteSettings> {
        self.file
            .update(SiteSettings::default, |settings| {
                change(settings);
                Ok(settings.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn defaults_are_written_on_first_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let repo = JsonSettingsRepository::new(&path);
        let settings = repo.load().await.unwrap();
        assert_eq!(settings, SiteSettings::default());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn unknown_keys_survive_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"sidebar_title":"S","footer":"kept"}"#).unwrap();
        let repo = JsonSettingsRepository::new(&path);

        repo.update(Box::new(|settings| settings.main_title = "M".into()))
            .await
            .unwrap();

        let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["footer"], "kept");
        assert_eq!(raw["sidebar_title"], "S");
        assert_eq!(raw["main_title"], "M");
    }

    #[tokio::test]
    async fn concurrent_updates_are_serialized() {
        let dir = TempDir::new().unwrap();
        let repo = std::sync::Arc::new(JsonSettingsRepository::new(dir.path().join("config.json")));

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.update(Box::new(|settings| settings.lock_banner.push('x')))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let banner = repo.load().await.unwrap().lock_banner;
        assert_eq!(banner.len() - SiteSettings::default().lock_banner.len(), 20);
    }
}
