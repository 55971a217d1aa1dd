//! Aggregate figures shown above the asset grid

use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use super::{EquipmentStatus, EquipmentTable};

/// Age thresholds in years. Each bucket counts rows at or above it.
pub const AGE_THRESHOLDS: [i32; 4] = [5, 7, 10, 13];

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct AgeBuckets {
    pub at_least_5: usize,
    pub at_least_7: usize,
    pub at_least_10: usize,
    pub at_least_13: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct AssetMetrics {
    pub total_records: usize,
    /// Sum of the `value` column; empty and non-numeric cells are skipped
    pub total_value: f64,
    pub department_count: usize,
    /// Rows with at least one empty cell
    pub incomplete_records: usize,
    /// Rows whose status is `normal`
    pub in_service: usize,
    pub reference_year: i32,
    pub age_buckets: AgeBuckets,
}

impl AssetMetrics {
    pub fn compute(table: &EquipmentTable, reference_year: i32) -> Self {
        let mut departments: HashSet<&str> = HashSet::new();
        let mut metrics = AssetMetrics {
            total_records: table.len(),
            reference_year,
            ..Default::default()
        };

        for row in &table.rows {
            if let Some(value) = row.numeric_value() {
                metrics.total_value += value;
            }

            let department = row.department.trim();
            if !department.is_empty() {
                departments.insert(department);
            }

            if row.has_empty_field() {
                metrics.incomplete_records += 1;
            }

            if EquipmentStatus::parse(row.status.trim()) == Some(EquipmentStatus::Normal) {
                metrics.in_service += 1;
            }

            if let Some(year) = row.manufacture_year() {
                let age = reference_year - year;
                let buckets = &mut metrics.age_buckets;
                for (threshold, counter) in AGE_THRESHOLDS.iter().zip([
                    &mut buckets.at_least_5,
                    &mut buckets.at_least_7,
                    &mut buckets.at_least_10,
                    &mut buckets.at_least_13,
                ]) {
                    if age >= *threshold {
                        *counter += 1;
                    }
                }
            }
        }

        metrics.department_count = departments.len();
        metrics
    }
}
