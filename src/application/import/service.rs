//! Import run: read sources, reconcile, overwrite the equipment table

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::equipment::reconcile;
use crate::domain::{DomainResult, EquipmentRepositoryInterface, ImportSourceProvider};

#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Rows merged; 0 means nothing was written
    pub rows: usize,
    /// Source file names used, in merge order
    pub sources: Vec<String>,
}

impl ImportOutcome {
    pub fn written(&self) -> bool {
        self.rows > 0
    }
}

pub struct ImportService {
    sources: Arc<dyn ImportSourceProvider>,
    equipment: Arc<dyn EquipmentRepositoryInterface>,
}

impl ImportService {
    pub fn new(
        sources: Arc<dyn ImportSourceProvider>,
        equipment: Arc<dyn EquipmentRepositoryInterface>,
    ) -> Self {
        Self { sources, equipment }
    }

    /// A run that merges zero rows leaves the equipment table untouched.
    pub async fn run(&self) -> DomainResult<ImportOutcome> {
        let frames = self.sources.load_sources().await?;
        let sources: Vec<String> = frames.iter().map(|f| f.name.clone()).collect();
        let table = reconcile(&frames);

        if table.is_empty() {
            warn!(sources = ?sources, "Import produced no rows; equipment table left unchanged");
            return Ok(ImportOutcome { rows: 0, sources });
        }

        let table = self.equipment.update(Box::new(move |_| Ok(table))).await?;
        metrics::counter!("portal_import_rows_total").increment(table.len() as u64);
        info!(rows = table.len(), sources = ?sources, "Import written to equipment table");
        Ok(ImportOutcome {
            rows: table.len(),
            sources,
        })
    }
}
