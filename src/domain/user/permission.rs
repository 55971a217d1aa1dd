//! Feature permissions

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;
use utoipa::ToSchema;

/// Feature area an account may navigate to.
///
/// Declaration order is the canonical order used for sets and menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    AssetRecords,
    RepairManagement,
    FileLibrary,
    CoreFiles,
    #[serde(alias = "admin-panal")]
    AdminPanel,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::AssetRecords,
        Permission::RepairManagement,
        Permission::FileLibrary,
        Permission::CoreFiles,
        Permission::AdminPanel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssetRecords => "asset-records",
            Self::RepairManagement => "repair-management",
            Self::FileLibrary => "file-library",
            Self::CoreFiles => "core-files",
            Self::AdminPanel => "admin-panel",
        }
    }

    /// Stored tag to permission, accepting the legacy admin spelling.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "admin-panal" => Some(Self::AdminPanel),
            _ => Self::ALL.into_iter().find(|p| p.as_str() == tag),
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Duplicate-free permission subset, serialized as a JSON array.
/// Unknown tags are dropped on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tags = Vec::<String>::deserialize(deserializer)?;
        Ok(tags
            .iter()
            .filter_map(|tag| {
                let permission = Permission::parse(tag);
                if permission.is_none() {
                    warn!(tag = %tag, "Unknown permission tag ignored");
                }
                permission
            })
            .collect())
    }
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Permission::ALL.into_iter().collect()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn union(&self, other: &PermissionSet) -> PermissionSet {
        self.0.union(&other.0).copied().collect()
    }

    pub fn to_vec(&self) -> Vec<Permission> {
        self.iter().collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(value: Vec<Permission>) -> Self {
        value.into_iter().collect()
    }
}
