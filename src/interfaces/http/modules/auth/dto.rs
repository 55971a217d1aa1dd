//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{MenuEntry, Permission, Session};

/// Empty id or password is not a validation error here: it fails the
/// credential check like any other mismatch.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(max = 128, message = "account id is too long"))]
    pub id: String,
    #[validate(length(max = 256, message = "password is too long"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub session: SessionInfo,
}

/// Session as reported to its owner.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionInfo {
    pub logged_in: bool,
    pub user_id: String,
    pub display_name: String,
    pub role: String,
    /// Stored permissions captured at login
    pub permissions: Vec<Permission>,
    /// Permissions after the admin union
    pub effective_permissions: Vec<Permission>,
    pub active_view: MenuEntry,
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        Self {
            logged_in: session.logged_in,
            user_id: session.user_id.clone(),
            display_name: session.display_name.clone(),
            role: session.role.to_string(),
            permissions: session.permissions.to_vec(),
            effective_permissions: session.effective_permissions().to_vec(),
            active_view: session.active_view,
        }
    }
}
