//! Work-file library zones

use std::path::{Component, Path};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::user::Permission;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LibraryZone {
    Public,
    Core,
}

impl LibraryZone {
    pub const ALL: [LibraryZone; 2] = [Self::Public, Self::Core];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Core => "core",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|z| z.as_str() == value)
    }

    /// Extra permission needed on top of `file-library`.
    pub fn extra_permission(&self) -> Option<Permission> {
        match self {
            Self::Public => None,
            Self::Core => Some(Permission::CoreFiles),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Spreadsheet,
    Document,
}

impl FileKind {
    pub fn from_name(name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if extension == "pdf" {
            Self::Pdf
        } else if extension.contains("xls") {
            Self::Spreadsheet
        } else {
            Self::Document
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LibraryFile {
    pub name: String,
    pub size_bytes: u64,
    pub kind: FileKind,
}

/// Reject anything but one normal path component.
pub fn validate_file_name(name: &str) -> DomainResult<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(DomainError::Validation(format!("Invalid file name '{}'", name))),
    }
}

#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Files of one zone sorted by name; the zone directory is created if missing.
    async fn list(&self, zone: LibraryZone) -> DomainResult<Vec<LibraryFile>>;

    async fn read(&self, zone: LibraryZone, name: &str) -> DomainResult<Vec<u8>>;
}
