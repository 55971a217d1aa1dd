//! User account entity

use serde::{Deserialize, Serialize};

use super::{Permission, PermissionSet};

/// Account id that is granted every permission regardless of its stored set.
pub const RESERVED_ADMIN_ID: &str = "admin";

/// Free-form role tag. Only `admin` carries meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Admin,
    Staff,
    Other(String),
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Staff
    }
}

impl From<String> for UserRole {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Self::Admin,
            "staff" => Self::Staff,
            _ => Self::Other(value),
        }
    }
}

impl From<UserRole> for String {
    fn from(value: UserRole) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value of the user table, keyed by account id on disk.
///
/// Passwords are stored and compared as plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, alias = "permissions")]
    pub perms: PermissionSet,
}

/// A user record together with its account id.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub id: String,
    pub record: UserRecord,
}

impl UserAccount {
    pub fn new(id: impl Into<String>, record: UserRecord) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.record.name.is_empty() {
            &self.id
        } else {
            &self.record.name
        }
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.record.password == candidate
    }

    pub fn effective_permissions(&self) -> PermissionSet {
        effective_permissions(&self.id, &self.record.role, &self.record.perms)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.effective_permissions().contains(permission)
    }
}

/// Capability union: the stored set, plus everything for admin-role
/// accounts and for the reserved `admin` id.
///
/// Every permission check in the crate goes through here.
pub fn effective_permissions(account_id: &str, role: &UserRole, stored: &PermissionSet) -> PermissionSet {
    if role.is_admin() || account_id == RESERVED_ADMIN_ID {
        stored.union(&PermissionSet::all())
    } else {
        stored.clone()
    }
}

/// Table seeded when the user file does not exist yet.
///
/// Known weak credential; kept for compatibility and logged at startup.
pub fn default_admin_account() -> UserAccount {
    UserAccount::new(
        RESERVED_ADMIN_ID,
        UserRecord {
            password: "123".to_string(),
            name: "Administrator".to_string(),
            role: UserRole::Admin,
            perms: PermissionSet::new(),
        },
    )
}
