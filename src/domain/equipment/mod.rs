//! Equipment registry aggregate
//!
//! The canonical table, grid edits, aggregate metrics and import
//! reconciliation.

pub mod metrics;
pub mod model;
pub mod reconcile;
pub mod repository;

pub use metrics::{AgeBuckets, AssetMetrics, AGE_THRESHOLDS};
pub use model::{
    DepartmentGroup, EquipmentRecord, EquipmentStatus, EquipmentTable, GridEdit,
    CANONICAL_COLUMNS, UNCLASSIFIED_DEPARTMENT,
};
pub use reconcile::{reconcile, SourceFrame, RENAME_RULES};
pub use repository::{EquipmentRepositoryInterface, ImportSourceProvider, TableUpdate};
