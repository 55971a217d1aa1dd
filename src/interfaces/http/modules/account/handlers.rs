//! Personal settings

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::UserService;
use crate::infrastructure::JsonUserRepository;
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, MessageData, ValidatedJson};
use crate::interfaces::http::middleware::CurrentSession;

#[derive(Clone)]
pub struct AccountState {
    pub users: Arc<UserService<JsonUserRepository>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(max = 256, message = "new password is too long"))]
    pub new_password: String,
}

#[utoipa::path(
    put,
    path = "/api/v1/account/password",
    tag = "Account",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<MessageData>),
        (status = 400, description = "Empty password"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn change_password(
    State(state): State<AccountState>,
    Extension(current): Extension<CurrentSession>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageData>>, ApiError> {
    state
        .users
        .change_own_password(&current.session.user_id, &request.new_password)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(MessageData::new("Password changed"))))
}
