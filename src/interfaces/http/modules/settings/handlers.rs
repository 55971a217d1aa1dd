//! Public site settings and logo

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::SettingsService;
use crate::domain::SiteSettings;
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse};

#[derive(Clone)]
pub struct SettingsState {
    pub settings: Arc<SettingsService>,
}

/// Settings without the inline logo payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct SiteSettingsDto {
    pub sidebar_title: String,
    pub main_title: String,
    pub lock_banner: String,
    pub has_logo: bool,
}

impl From<SiteSettings> for SiteSettingsDto {
    fn from(settings: SiteSettings) -> Self {
        Self {
            has_logo: settings.logo_base64.is_some(),
            sidebar_title: settings.sidebar_title,
            main_title: settings.main_title,
            lock_banner: settings.lock_banner,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/settings",
    tag = "Settings",
    responses((status = 200, description = "Site titles and banner", body = ApiResponse<SiteSettingsDto>))
)]
pub async fn get_settings(
    State(state): State<SettingsState>,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    let settings = state.settings.current().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(settings.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/settings/logo",
    tag = "Settings",
    responses(
        (status = 200, description = "Logo image bytes"),
        (status = 404, description = "No logo configured")
    )
)]
pub async fn get_logo(State(state): State<SettingsState>) -> Result<Response, ApiError> {
    let logo = state.settings.logo().await.map_err(api_error)?;
    Ok(([(header::CONTENT_TYPE, logo.content_type)], logo.bytes).into_response())
}
