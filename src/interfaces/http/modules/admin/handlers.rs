//! Admin panel handlers
//!
//! Every route here sits behind the `admin-panel` guard.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AccountDto, CreateAccountRequest, ResetPasswordRequest, SetPermissionsRequest,
    UpdateSettingsRequest,
};
use crate::application::{SettingsService, UserService};
use crate::domain::{CreateAccountDto, SettingsUpdate, UserRole};
use crate::infrastructure::JsonUserRepository;
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, MessageData, ValidatedJson};
use crate::interfaces::http::modules::settings::SiteSettingsDto;

#[derive(Clone)]
pub struct AdminState {
    pub users: Arc<UserService<JsonUserRepository>>,
    pub settings: Arc<SettingsService>,
}

// ── Site settings ───────────────────────────────────────────────

#[utoipa::path(
    put,
    path = "/api/v1/admin/settings",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings saved", body = ApiResponse<SiteSettingsDto>),
        (status = 400, description = "Logo is not valid base64"),
        (status = 403, description = "admin-panel permission required")
    )
)]
pub async fn update_settings(
    State(state): State<AdminState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    let settings = state
        .settings
        .update(SettingsUpdate {
            sidebar_title: request.sidebar_title,
            main_title: request.main_title,
            lock_banner: request.lock_banner,
            logo_base64: request.logo_base64,
        })
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(settings.into())))
}

// ── Accounts ────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All accounts", body = ApiResponse<Vec<AccountDto>>))
)]
pub async fn list_users(
    State(state): State<AdminState>,
) -> Result<Json<ApiResponse<Vec<AccountDto>>>, ApiError> {
    let accounts = state.users.list_accounts().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        accounts.into_iter().map(AccountDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountDto>),
        (status = 400, description = "Empty id or password"),
        (status = 409, description = "Account id already exists")
    )
)]
pub async fn create_user(
    State(state): State<AdminState>,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountDto>>), ApiError> {
    let account = state
        .users
        .create_account(CreateAccountDto {
            id: request.id,
            name: request.name,
            password: request.password,
            role: request.role.map(UserRole::from),
        })
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(account.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/permissions",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Account id")),
    request_body = SetPermissionsRequest,
    responses(
        (status = 200, description = "Permissions replaced; applies from the account's next login", body = ApiResponse<AccountDto>),
        (status = 404, description = "Unknown account")
    )
)]
pub async fn set_permissions(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    Json(request): Json<SetPermissionsRequest>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    let account = state
        .users
        .set_permissions(&id, request.permissions.into())
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(account.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/password",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Account id")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = ApiResponse<MessageData>),
        (status = 400, description = "Empty password"),
        (status = 404, description = "Unknown account")
    )
)]
pub async fn reset_password(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageData>>, ApiError> {
    state
        .users
        .reset_password(&id, &request.password)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(MessageData::new(format!(
        "Password for '{}' reset",
        id
    )))))
}
