//! Admin panel DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Permission, UserAccount};

/// Account as listed in the admin panel. Passwords never leave the server.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountDto {
    pub id: String,
    pub name: String,
    pub role: String,
    pub permissions: Vec<Permission>,
    pub effective_permissions: Vec<Permission>,
}

impl From<UserAccount> for AccountDto {
    fn from(account: UserAccount) -> Self {
        Self {
            effective_permissions: account.effective_permissions().to_vec(),
            permissions: account.record.perms.to_vec(),
            role: account.record.role.to_string(),
            name: account.record.name,
            id: account.id,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(max = 64, message = "account id must be at most 64 characters"))]
    pub id: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "name must be at most 100 characters"))]
    pub name: String,
    pub password: String,
    /// Defaults to `staff`
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPermissionsRequest {
    /// Replaces the stored set
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(max = 256, message = "password is too long"))]
    pub password: String,
}

/// Admin settings edit; omitted fields stay as they are.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub sidebar_title: Option<String>,
    pub main_title: Option<String>,
    pub lock_banner: Option<String>,
    /// Standard base64 image; empty string removes the logo
    pub logo_base64: Option<String>,
}
