//! Per-login session state

use chrono::{DateTime, Utc};

use super::MenuEntry;
use crate::domain::user::{effective_permissions, Permission, PermissionSet, UserAccount, UserRole};
use crate::domain::{DomainError, DomainResult};

/// Server-side record of one login.
///
/// Fields are copied from the user record at login time and never
/// refreshed, so admin edits apply from the next login on.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub logged_in: bool,
    pub user_id: String,
    pub display_name: String,
    pub role: UserRole,
    pub permissions: PermissionSet,
    pub active_view: MenuEntry,
    pub opened_at: DateTime<Utc>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            logged_in: false,
            user_id: String::new(),
            display_name: String::new(),
            role: UserRole::default(),
            permissions: PermissionSet::new(),
            active_view: MenuEntry::Home,
            opened_at: Utc::now(),
        }
    }

    pub fn from_account(account: &UserAccount) -> Self {
        Self {
            logged_in: true,
            user_id: account.id.clone(),
            display_name: account.display_name().to_string(),
            role: account.record.role.clone(),
            permissions: account.record.perms.clone(),
            active_view: MenuEntry::Home,
            opened_at: Utc::now(),
        }
    }

    /// Snapshot permissions passed through the capability union.
    pub fn effective_permissions(&self) -> PermissionSet {
        if !self.logged_in {
            return PermissionSet::new();
        }
        effective_permissions(&self.user_id, &self.role, &self.permissions)
    }

    pub fn holds(&self, permission: Permission) -> bool {
        self.effective_permissions().contains(permission)
    }

    pub fn require_login(&self) -> DomainResult<()> {
        if self.logged_in {
            Ok(())
        } else {
            Err(DomainError::Unauthorized("Sign in required".to_string()))
        }
    }

    /// Logged in and effectively holding `permission`.
    pub fn require(&self, permission: Permission) -> DomainResult<()> {
        self.require_login()?;
        if self.holds(permission) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!("Missing permission '{}'", permission)))
        }
    }

    /// Clear login state in place.
    pub fn logout(&mut self) {
        self.logged_in = false;
        self.permissions = PermissionSet::new();
        self.active_view = MenuEntry::Home;
    }
}
