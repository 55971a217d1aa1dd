//! Site settings and logo

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

use crate::domain::{
    DomainError, DomainResult, SettingsRepositoryInterface, SettingsUpdate, SiteSettings,
};

/// Decoded logo image.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Content type from leading magic bytes.
pub fn sniff_image_type(bytes: &[u8]) -> &'static str {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let text_head = &bytes[start..];

    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(b"\xFF\xD8\xFF") {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if text_head.starts_with(b"<svg") || text_head.starts_with(b"<?xml") {
        "image/svg+xml"
    } else {
        "application/octet-stream"
    }
}

pub struct SettingsService {
    repo: Arc<dyn SettingsRepositoryInterface>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepositoryInterface>) -> Self {
        Self { repo }
    }

    pub async fn current(&self) -> DomainResult<SiteSettings> {
        self.repo.load().await
    }

    pub async fn update(&self, update: SettingsUpdate) -> DomainResult<SiteSettings> {
        if let Some(logo) = update.logo_base64.as_deref().filter(|l| !l.is_empty()) {
            STANDARD
                .decode(logo)
                .map_err(|e| DomainError::Validation(format!("Logo is not valid base64: {}", e)))?;
        }

        let settings = self
            .repo
            .update(Box::new(move |settings| settings.apply(update)))
            .await?;
        info!(has_logo = settings.logo_base64.is_some(), "Site settings updated");
        Ok(settings)
    }

    /// Decoded logo; `NotFound` when none is configured.
    pub async fn logo(&self) -> DomainResult<Logo> {
        let settings = self.repo.load().await?;
        let encoded = settings.logo_base64.ok_or_else(|| DomainError::NotFound {
            entity: "Logo",
            field: "logo_base64",
            value: String::new(),
        })?;
        let bytes = STANDARD.decode(encoded.trim()).map_err(|e| DomainError::MalformedFile {
            file: "site settings".to_string(),
            reason: format!("stored logo is not valid base64: {}", e),
        })?;
        Ok(Logo {
            content_type: sniff_image_type(&bytes),
            bytes,
        })
    }
}
