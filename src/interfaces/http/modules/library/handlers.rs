//! File library handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::application::{LibraryListing, LibraryService};
use crate::domain::{DomainError, LibraryZone};
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse};
use crate::interfaces::http::middleware::CurrentSession;

#[derive(Clone)]
pub struct LibraryState {
    pub library: Arc<LibraryService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/library",
    tag = "Library",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Visible zones and their files", body = ApiResponse<LibraryListing>))
)]
pub async fn list_library(
    State(state): State<LibraryState>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<ApiResponse<LibraryListing>>, ApiError> {
    let listing = state.library.list(&current.session).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(listing)))
}

#[utoipa::path(
    get,
    path = "/api/v1/library/{zone}/{file_name}",
    tag = "Library",
    security(("bearer_auth" = [])),
    params(
        ("zone" = String, Path, description = "`public` or `core`"),
        ("file_name" = String, Path, description = "Plain file name")
    ),
    responses(
        (status = 200, description = "File bytes"),
        (status = 400, description = "Invalid file name"),
        (status = 403, description = "Core zone requires core-files"),
        (status = 404, description = "No such file or zone")
    )
)]
pub async fn download_file(
    State(state): State<LibraryState>,
    Extension(current): Extension<CurrentSession>,
    Path((zone, file_name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let zone = LibraryZone::parse(&zone).ok_or_else(|| {
        api_error(DomainError::NotFound {
            entity: "Library zone",
            field: "name",
            value: zone.clone(),
        })
    })?;
    let bytes = state
        .library
        .download(&current.session, zone, &file_name)
        .await
        .map_err(api_error)?;

    let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', ""));
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
