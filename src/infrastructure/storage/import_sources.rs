//! Numbered import sheets: `<dir>/<prefix><n>.<ext>`

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use super::csv_codec;
use super::file_store::read_optional;
use crate::config::ImportConfig;
use crate::domain::{DomainResult, ImportSourceProvider, SourceFrame};

pub struct CsvImportSources {
    config: ImportConfig,
}

impl CsvImportSources {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Candidate paths in numeric order.
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        (1..=self.config.max_sources)
            .map(|n| {
                self.config.source_dir.join(format!(
                    "{}{}.{}",
                    self.config.file_prefix, n, self.config.extension
                ))
            })
            .collect()
    }
}

#[async_trait]
impl ImportSourceProvider for CsvImportSources {
    async fn load_sources(&self) -> DomainResult<Vec<SourceFrame>> {
        let mut frames = Vec::new();
        for path in self.candidate_paths() {
            let Some(bytes) = read_optional(&path).await? else {
                debug!(path = %path.display(), "Import source absent, skipping");
                continue;
            };
            let sheet = csv_codec::decode(&path, &bytes)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!(source = %name, rows = sheet.rows.len(), "Import source read");
            frames.push(SourceFrame {
                name,
                headers: sheet.headers,
                rows: sheet.rows,
            });
        }
        Ok(frames)
    }
}
