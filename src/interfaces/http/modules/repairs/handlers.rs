//! Repair intake handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::RepairService;
use crate::domain::{RepairRequest, RepairTicket};
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::CurrentSession;

#[derive(Clone)]
pub struct RepairState {
    pub repairs: Arc<RepairService>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitRepairRequest {
    #[validate(length(max = 64, message = "equipment id is too long"))]
    pub equipment_id: String,
    pub department: String,
    #[validate(length(max = 4000, message = "description is too long"))]
    pub description: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/repairs",
    tag = "Repairs",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Tickets, newest first", body = ApiResponse<Vec<RepairTicket>>))
)]
pub async fn list_repairs(
    State(state): State<RepairState>,
) -> Result<Json<ApiResponse<Vec<RepairTicket>>>, ApiError> {
    let tickets = state.repairs.list().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(tickets)))
}

#[utoipa::path(
    post,
    path = "/api/v1/repairs",
    tag = "Repairs",
    security(("bearer_auth" = [])),
    request_body = SubmitRepairRequest,
    responses(
        (status = 201, description = "Repair request accepted", body = ApiResponse<RepairTicket>),
        (status = 400, description = "Missing field or unknown department")
    )
)]
pub async fn submit_repair(
    State(state): State<RepairState>,
    Extension(current): Extension<CurrentSession>,
    ValidatedJson(request): ValidatedJson<SubmitRepairRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RepairTicket>>), ApiError> {
    let ticket = state
        .repairs
        .submit(
            &current.session,
            RepairRequest {
                equipment_id: request.equipment_id,
                department: request.department,
                description: request.description,
            },
        )
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(ticket))))
}

#[utoipa::path(
    get,
    path = "/api/v1/repairs/departments",
    tag = "Repairs",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Departments a ticket may name", body = ApiResponse<Vec<String>>))
)]
pub async fn list_departments(State(state): State<RepairState>) -> Json<ApiResponse<Vec<String>>> {
    Json(ApiResponse::success(state.repairs.departments().to_vec()))
}
