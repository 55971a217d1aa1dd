//! Sidebar navigation

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use super::dto::{NavigationView, SelectViewRequest};
use crate::application::{SettingsService, SharedSessionRegistry};
use crate::domain::session::select_view;
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse};
use crate::interfaces::http::middleware::CurrentSession;

#[derive(Clone)]
pub struct NavigationState {
    pub settings: Arc<SettingsService>,
    pub registry: SharedSessionRegistry,
}

#[utoipa::path(
    get,
    path = "/api/v1/navigation",
    tag = "Navigation",
    responses((status = 200, description = "Menu for the caller", body = ApiResponse<NavigationView>))
)]
pub async fn get_navigation(
    State(state): State<NavigationState>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<ApiResponse<NavigationView>>, ApiError> {
    let settings = state.settings.current().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(NavigationView::new(
        &settings,
        &current.session,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/navigation/select",
    tag = "Navigation",
    request_body = SelectViewRequest,
    responses(
        (status = 200, description = "Active view changed", body = ApiResponse<NavigationView>),
        (status = 403, description = "Entry not in the caller's menu")
    )
)]
pub async fn select(
    State(state): State<NavigationState>,
    Extension(current): Extension<CurrentSession>,
    Json(request): Json<SelectViewRequest>,
) -> Result<Json<ApiResponse<NavigationView>>, ApiError> {
    let session = match current.session_id.as_deref() {
        Some(id) => state.registry.select_view(id, request.entry).map_err(api_error)?,
        None => {
            let mut session = current.session;
            select_view(&mut session, request.entry).map_err(api_error)?;
            session
        }
    };
    let settings = state.settings.current().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(NavigationView::new(&settings, &session))))
}
