//! Login, logout and current session

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use super::dto::{LoginRequest, LoginResponse, SessionInfo};
use crate::application::SessionService;
use crate::infrastructure::JsonUserRepository;
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, MessageData, ValidatedJson};
use crate::interfaces::http::middleware::CurrentSession;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub sessions: Arc<SessionService<JsonUserRepository>>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid account id or password")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let result = state
        .sessions
        .login(&request.id, &request.password)
        .await
        .map_err(api_error)?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token: result.token,
        token_type: result.token_type,
        expires_in: result.expires_in,
        session: SessionInfo::from(&result.session),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Logged out (also when no session was open)", body = ApiResponse<MessageData>))
)]
pub async fn logout(
    State(state): State<AuthHandlerState>,
    Extension(current): Extension<CurrentSession>,
) -> Json<ApiResponse<MessageData>> {
    state.sessions.logout(current.session_id.as_deref());
    Json(ApiResponse::success(MessageData::new("Logged out")))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionInfo>),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn me(Extension(current): Extension<CurrentSession>) -> Json<ApiResponse<SessionInfo>> {
    Json(ApiResponse::success(SessionInfo::from(&current.session)))
}
