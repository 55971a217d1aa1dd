//! Import reconciliation into the canonical schema
//!
//! Each source sheet is mapped column-by-column: fixed rename rules first,
//! then exact canonical header matches (so an exact column wins over a
//! renamed one). Anything else is dropped.

use super::{EquipmentRecord, EquipmentTable, CANONICAL_COLUMNS};

/// Source header → canonical column.
pub const RENAME_RULES: [(&str, &str); 3] = [
    ("device-name", "equipment-name"),
    ("asset-name", "equipment-name-alias"),
    ("old-code", "legacy-code"),
];

/// One external sheet, already decoded into header + string rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFrame {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// How one source header is carried into the canonical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRule {
    Rename(&'static str),
    Copy(&'static str),
}

fn rule_for(header: &str) -> Option<ColumnRule> {
    let header = header.trim();
    if let Some(canonical) = CANONICAL_COLUMNS.iter().find(|c| **c == header) {
        return Some(ColumnRule::Copy(*canonical));
    }
    RENAME_RULES
        .iter()
        .find(|(source, _)| *source == header)
        .map(|(_, target)| ColumnRule::Rename(*target))
}

impl SourceFrame {
    /// Map this sheet into canonical records. Sequence numbers are left empty.
    pub fn to_canonical(&self) -> Vec<EquipmentRecord> {
        let rules: Vec<(usize, ColumnRule)> = self
            .headers
            .iter()
            .enumerate()
            .filter_map(|(idx, header)| rule_for(header).map(|rule| (idx, rule)))
            .collect();

        self.rows
            .iter()
            .map(|cells| {
                let mut record = EquipmentRecord::default();
                let renames = rules.iter().filter(|(_, r)| matches!(r, ColumnRule::Rename(_)));
                let copies = rules.iter().filter(|(_, r)| matches!(r, ColumnRule::Copy(_)));
                for (idx, rule) in renames.chain(copies) {
                    let target = match rule {
                        ColumnRule::Rename(t) | ColumnRule::Copy(t) => *t,
                    };
                    if let (Some(value), Some(cell)) = (cells.get(*idx), record.get_mut(target)) {
                        *cell = value.clone();
                    }
                }
                record.sequence_number.clear();
                record
            })
            .collect()
    }
}

/// Concatenate all sources in order and renumber 1..N.
pub fn reconcile(sources: &[SourceFrame]) -> EquipmentTable {
    let mut table = EquipmentTable::new(sources.iter().flat_map(SourceFrame::to_canonical).collect());
    table.renumber();
    table
}
