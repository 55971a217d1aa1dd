//! Asset registry handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{
    ApplyEditsRequest, AssetTableResponse, DepartmentGroupDto, ImportResponse, SaveTableRequest,
};
use crate::application::{AssetService, ImportService};
use crate::domain::{AssetMetrics, DomainError, EquipmentTable};
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse};

#[derive(Clone)]
pub struct AssetState {
    pub assets: Arc<AssetService>,
    pub import: Arc<ImportService>,
    pub reference_year: i32,
}

impl AssetState {
    fn table_response(&self, table: EquipmentTable) -> AssetTableResponse {
        let metrics = AssetMetrics::compute(&table, self.reference_year);
        AssetTableResponse::new(table.rows, metrics)
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/assets",
    tag = "Assets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Equipment table with metrics", body = ApiResponse<AssetTableResponse>),
        (status = 404, description = "Equipment table not initialized"),
        (status = 500, description = "Equipment file is malformed")
    )
)]
pub async fn list_assets(
    State(state): State<AssetState>,
) -> Result<Json<ApiResponse<AssetTableResponse>>, ApiError> {
    let overview = state.assets.overview().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(AssetTableResponse::new(
        overview.table.rows,
        overview.metrics,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/assets/metrics",
    tag = "Assets",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Aggregate metrics", body = ApiResponse<AssetMetrics>))
)]
pub async fn get_metrics(
    State(state): State<AssetState>,
) -> Result<Json<ApiResponse<AssetMetrics>>, ApiError> {
    let metrics = state.assets.metrics().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(metrics)))
}

#[utoipa::path(
    get,
    path = "/api/v1/assets/grouped",
    tag = "Assets",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Rows grouped by department", body = ApiResponse<Vec<DepartmentGroupDto>>))
)]
pub async fn get_grouped(
    State(state): State<AssetState>,
) -> Result<Json<ApiResponse<Vec<DepartmentGroupDto>>>, ApiError> {
    let groups = state.assets.grouped().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        groups.into_iter().map(DepartmentGroupDto::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/assets",
    tag = "Assets",
    security(("bearer_auth" = [])),
    request_body = SaveTableRequest,
    responses(
        (status = 200, description = "Table saved and renumbered", body = ApiResponse<AssetTableResponse>),
        (status = 400, description = "Invalid status value")
    )
)]
pub async fn save_assets(
    State(state): State<AssetState>,
    Json(request): Json<SaveTableRequest>,
) -> Result<Json<ApiResponse<AssetTableResponse>>, ApiError> {
    let saved = state
        .assets
        .save(EquipmentTable::new(request.rows))
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(state.table_response(saved))))
}

#[utoipa::path(
    post,
    path = "/api/v1/assets/edits",
    tag = "Assets",
    security(("bearer_auth" = [])),
    request_body = ApplyEditsRequest,
    responses(
        (status = 200, description = "Edits applied and saved", body = ApiResponse<AssetTableResponse>),
        (status = 400, description = "Bad row index, column or status")
    )
)]
pub async fn apply_edits(
    State(state): State<AssetState>,
    Json(request): Json<ApplyEditsRequest>,
) -> Result<Json<ApiResponse<AssetTableResponse>>, ApiError> {
    let saved = state
        .assets
        .apply_edits(request.edits)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(state.table_response(saved))))
}

#[utoipa::path(
    post,
    path = "/api/v1/assets/import",
    tag = "Assets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sources merged into the equipment table", body = ApiResponse<ImportResponse>),
        (status = 400, description = "Sources present but contained no rows"),
        (status = 404, description = "No import source found")
    )
)]
pub async fn run_import(
    State(state): State<AssetState>,
) -> Result<Json<ApiResponse<ImportResponse>>, ApiError> {
    let outcome = state.import.run().await.map_err(api_error)?;
    if !outcome.written() {
        let err = if outcome.sources.is_empty() {
            DomainError::FileNotFound("no import source files present".to_string())
        } else {
            DomainError::Validation(format!(
                "Import sources {} contained no rows; equipment table unchanged",
                outcome.sources.join(", ")
            ))
        };
        return Err(api_error(err));
    }
    Ok(Json(ApiResponse::success(ImportResponse {
        rows: outcome.rows,
        sources: outcome.sources,
    })))
}
