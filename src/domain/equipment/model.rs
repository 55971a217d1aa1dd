//! Equipment registry entities

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DomainError, DomainResult};

/// Canonical column headers, in file order.
pub const CANONICAL_COLUMNS: [&str; 24] = [
    "sequence-number",
    "department",
    "equipment-name",
    "equipment-name-alias",
    "national-standard-code",
    "serial-number",
    "legacy-code",
    "value",
    "price",
    "quantity",
    "brand",
    "model",
    "manufacture-serial",
    "manufacture-date",
    "acceptance-date",
    "status",
    "license-number",
    "service-life-years",
    "transfer-status",
    "disposal-eligible-year",
    "vendor-phone",
    "workstation-vendor",
    "workstation-vendor-phone",
    "notes",
];

/// Group label for rows without a department.
pub const UNCLASSIFIED_DEPARTMENT: &str = "unclassified";

/// Values the status column may hold when edited through the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EquipmentStatus {
    Normal,
    InRepair,
    Sealed,
    AwaitingDisposal,
    UnderCalibration,
}

impl EquipmentStatus {
    pub const ALL: [EquipmentStatus; 5] = [
        Self::Normal,
        Self::InRepair,
        Self::Sealed,
        Self::AwaitingDisposal,
        Self::UnderCalibration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::InRepair => "in-repair",
            Self::Sealed => "sealed",
            Self::AwaitingDisposal => "awaiting-disposal",
            Self::UnderCalibration => "under-calibration",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// One row of the equipment table. Every cell is free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case", default)]
pub struct EquipmentRecord {
    pub sequence_number: String,
    pub department: String,
    pub equipment_name: String,
    pub equipment_name_alias: String,
    pub national_standard_code: String,
    pub serial_number: String,
    pub legacy_code: String,
    pub value: String,
    pub price: String,
    pub quantity: String,
    pub brand: String,
    pub model: String,
    pub manufacture_serial: String,
    pub manufacture_date: String,
    pub acceptance_date: String,
    pub status: String,
    pub license_number: String,
    pub service_life_years: String,
    pub transfer_status: String,
    pub disposal_eligible_year: String,
    pub vendor_phone: String,
    pub workstation_vendor: String,
    pub workstation_vendor_phone: String,
    pub notes: String,
}

impl EquipmentRecord {
    /// Cell by canonical column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        let cell = match column {
            "sequence-number" => &self.sequence_number,
            "department" => &self.department,
            "equipment-name" => &self.equipment_name,
            "equipment-name-alias" => &self.equipment_name_alias,
            "national-standard-code" => &self.national_standard_code,
            "serial-number" => &self.serial_number,
            "legacy-code" => &self.legacy_code,
            "value" => &self.value,
            "price" => &self.price,
            "quantity" => &self.quantity,
            "brand" => &self.brand,
            "model" => &self.model,
            "manufacture-serial" => &self.manufacture_serial,
            "manufacture-date" => &self.manufacture_date,
            "acceptance-date" => &self.acceptance_date,
            "status" => &self.status,
            "license-number" => &self.license_number,
            "service-life-years" => &self.service_life_years,
            "transfer-status" => &self.transfer_status,
            "disposal-eligible-year" => &self.disposal_eligible_year,
            "vendor-phone" => &self.vendor_phone,
            "workstation-vendor" => &self.workstation_vendor,
            "workstation-vendor-phone" => &self.workstation_vendor_phone,
            "notes" => &self.notes,
            _ => return None,
        };
        Some(cell.as_str())
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut String> {
        let cell = match column {
            "sequence-number" => &mut self.sequence_number,
            "department" => &mut self.department,
            "equipment-name" => &mut self.equipment_name,
            "equipment-name-alias" => &mut self.equipment_name_alias,
            "national-standard-code" => &mut self.national_standard_code,
            "serial-number" => &mut self.serial_number,
            "legacy-code" => &mut self.legacy_code,
            "value" => &mut self.value,
            "price" => &mut self.price,
            "quantity" => &mut self.quantity,
            "brand" => &mut self.brand,
            "model" => &mut self.model,
            "manufacture-serial" => &mut self.manufacture_serial,
            "manufacture-date" => &mut self.manufacture_date,
            "acceptance-date" => &mut self.acceptance_date,
            "status" => &mut self.status,
            "license-number" => &mut self.license_number,
            "service-life-years" => &mut self.service_life_years,
            "transfer-status" => &mut self.transfer_status,
            "disposal-eligible-year" => &mut self.disposal_eligible_year,
            "vendor-phone" => &mut self.vendor_phone,
            "workstation-vendor" => &mut self.workstation_vendor,
            "workstation-vendor-phone" => &mut self.workstation_vendor_phone,
            "notes" => &mut self.notes,
            _ => return None,
        };
        Some(cell)
    }

    /// Cells in canonical column order.
    pub fn cells(&self) -> impl Iterator<Item = &str> + '_ {
        CANONICAL_COLUMNS
            .iter()
            .map(move |column| self.get(column).unwrap_or_default())
    }

    pub fn has_empty_field(&self) -> bool {
        self.cells().any(|cell| cell.trim().is_empty())
    }

    /// Leading four characters of the manufacture date as a year.
    pub fn manufacture_year(&self) -> Option<i32> {
        let prefix: String = self.manufacture_date.trim().chars().take(4).collect();
        if prefix.chars().count() < 4 {
            return None;
        }
        prefix.parse().ok()
    }

    /// Numeric value, `None` for empty or non-numeric cells.
    pub fn numeric_value(&self) -> Option<f64> {
        self.value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

/// A grid operation on the in-memory table.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GridEdit {
    /// Append an empty row
    AddRow,
    /// Remove the row at `index` (0-based, current order)
    DeleteRow { index: usize },
    /// Overwrite one cell
    SetCell {
        index: usize,
        column: String,
        value: String,
    },
}

/// The whole equipment table, held in memory between load and save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquipmentTable {
    pub rows: Vec<EquipmentRecord>,
}

/// Rows sharing one department value.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DepartmentGroup {
    pub department: String,
    pub rows: Vec<EquipmentRecord>,
}

impl EquipmentTable {
    pub fn new(rows: Vec<EquipmentRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rewrite `sequence-number` as the dense run 1..N, discarding old values.
    pub fn renumber(&mut self) {
        for (idx, row) in self.rows.iter_mut().enumerate() {
            row.sequence_number = (idx + 1).to_string();
        }
    }

    pub fn apply(&mut self, edit: GridEdit) -> DomainResult<()> {
        match edit {
            GridEdit::AddRow => {
                self.rows.push(EquipmentRecord::default());
                Ok(())
            }
            GridEdit::DeleteRow { index } => {
                self.check_index(index)?;
                self.rows.remove(index);
                Ok(())
            }
            GridEdit::SetCell {
                index,
                column,
                value,
            } => {
                self.check_index(index)?;
                if column == "status" {
                    check_status(index, &value)?;
                }
                let cell = self.rows[index].get_mut(&column).ok_or_else(|| {
                    DomainError::Validation(format!("Unknown column '{}'", column))
                })?;
                *cell = value;
                Ok(())
            }
        }
    }

    fn check_index(&self, index: usize) -> DomainResult<()> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "Row index {} out of range (table has {} rows)",
                index,
                self.rows.len()
            )))
        }
    }

    /// Status cells must be empty, one of the allowed values, or a value
    /// already present in `existing`.
    pub fn validate_statuses(&self, existing: Option<&EquipmentTable>) -> DomainResult<()> {
        let known: HashSet<&str> = existing
            .map(|table| table.rows.iter().map(|row| row.status.trim()).collect())
            .unwrap_or_default();
        for (idx, row) in self.rows.iter().enumerate() {
            if !known.contains(row.status.trim()) {
                check_status(idx, &row.status)?;
            }
        }
        Ok(())
    }

    /// Partition by department in first-appearance order; the
    /// unclassified group, if any, comes last.
    pub fn group_by_department(&self) -> Vec<DepartmentGroup> {
        let mut groups: Vec<DepartmentGroup> = Vec::new();
        let mut unclassified: Vec<EquipmentRecord> = Vec::new();

        for row in &self.rows {
            let department = row.department.trim();
            if department.is_empty() {
                unclassified.push(row.clone());
                continue;
            }
            match groups.iter_mut().find(|g| g.department == department) {
                Some(group) => group.rows.push(row.clone()),
                None => groups.push(DepartmentGroup {
                    department: department.to_string(),
                    rows: vec![row.clone()],
                }),
            }
        }

        if !unclassified.is_empty() {
            groups.push(DepartmentGroup {
                department: UNCLASSIFIED_DEPARTMENT.to_string(),
                rows: unclassified,
            });
        }
        groups
    }
}

fn check_status(index: usize, status: &str) -> DomainResult<()> {
    let status = status.trim();
    if status.is_empty() || EquipmentStatus::parse(status).is_some() {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "Row {}: invalid status '{}'",
            index + 1,
            status
        )))
    }
}
