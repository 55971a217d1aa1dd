//! Asset registry DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::equipment::CANONICAL_COLUMNS;
use crate::domain::{AssetMetrics, DepartmentGroup, EquipmentRecord, EquipmentStatus, GridEdit};

#[derive(Debug, Serialize, ToSchema)]
pub struct AssetTableResponse {
    /// Canonical column order
    pub columns: Vec<String>,
    /// Values the status column accepts
    pub statuses: Vec<EquipmentStatus>,
    pub rows: Vec<EquipmentRecord>,
    pub metrics: AssetMetrics,
}

impl AssetTableResponse {
    pub fn new(rows: Vec<EquipmentRecord>, metrics: AssetMetrics) -> Self {
        Self {
            columns: CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            statuses: EquipmentStatus::ALL.to_vec(),
            rows,
            metrics,
        }
    }
}

/// One department section of the grouped view.
#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentGroupDto {
    pub department: String,
    pub count: usize,
    /// Groups start collapsed
    pub collapsed: bool,
    pub rows: Vec<EquipmentRecord>,
}

impl From<DepartmentGroup> for DepartmentGroupDto {
    fn from(group: DepartmentGroup) -> Self {
        Self {
            department: group.department,
            count: group.rows.len(),
            collapsed: true,
            rows: group.rows,
        }
    }
}

/// Whole-table replacement from the grid.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveTableRequest {
    pub rows: Vec<EquipmentRecord>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyEditsRequest {
    pub edits: Vec<GridEdit>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    pub rows: usize,
    pub sources: Vec<String>,
}
