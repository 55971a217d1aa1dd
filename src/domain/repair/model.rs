//! Repair tickets

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepairTicket {
    pub ticket_no: String,
    pub equipment_id: String,
    pub department: String,
    pub description: String,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
}

/// Form fields of a new repair request.
#[derive(Debug, Clone)]
pub struct RepairRequest {
    pub equipment_id: String,
    pub department: String,
    pub description: String,
}

impl RepairRequest {
    /// Trimmed copy; equipment id and description must be non-empty and
    /// the department must come from `departments`.
    pub fn validated(self, departments: &[String]) -> DomainResult<Self> {
        let request = Self {
            equipment_id: self.equipment_id.trim().to_string(),
            department: self.department.trim().to_string(),
            description: self.description.trim().to_string(),
        };
        if request.equipment_id.is_empty() {
            return Err(DomainError::Validation("Equipment id is required".to_string()));
        }
        if request.description.is_empty() {
            return Err(DomainError::Validation("Fault description is required".to_string()));
        }
        if !departments.iter().any(|d| *d == request.department) {
            return Err(DomainError::Validation(format!(
                "Unknown department '{}'",
                request.department
            )));
        }
        Ok(request)
    }
}

/// `REQ-MMDDHHMM` for the given local time, with `-2`, `-3`, … appended
/// until it is unused.
pub fn next_ticket_number<'a>(
    local_now: NaiveDateTime,
    taken: impl IntoIterator<Item = &'a str>,
) -> String {
    let base = format!("REQ-{}", local_now.format("%m%d%H%M"));
    let taken: Vec<&str> = taken.into_iter().collect();
    if !taken.contains(&base.as_str()) {
        return base;
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(&candidate.as_str()))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 30)
            .unwrap()
    }

    #[test]
    fn ticket_number_uses_month_day_hour_minute() {
        assert_eq!(next_ticket_number(at(3, 7, 9, 5), []), "REQ-03070905");
    }

    #[test]
    fn same_minute_gets_suffix() {
        let taken = ["REQ-03070905", "REQ-03070905-2"];
        assert_eq!(next_ticket_number(at(3, 7, 9, 5), taken), "REQ-03070905-3");
    }

    #[test]
    fn request_validation() {
        let departments = vec!["ICU".to_string(), "Radiology".to_string()];
        let ok = RepairRequest {
            equipment_id: " EQ-1 ".into(),
            department: "ICU".into(),
            description: "screen flickers".into(),
        }
        .validated(&departments)
        .unwrap();
        assert_eq!(ok.equipment_id, "EQ-1");

        let bad = RepairRequest {
            equipment_id: "EQ-1".into(),
            department: "Cafeteria".into(),
            description: "x".into(),
        };
        assert!(matches!(bad.validated(&departments), Err(DomainError::Validation(_))));

        let empty = RepairRequest {
            equipment_id: "".into(),
            department: "ICU".into(),
            description: "x".into(),
        };
        assert!(empty.validated(&departments).is_err());
    }
}
