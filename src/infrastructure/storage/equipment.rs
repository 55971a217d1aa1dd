//! Equipment table CSV file

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::csv_codec;
use super::file_store::{read_optional, write_atomic};
use crate::domain::equipment::{TableUpdate, CANONICAL_COLUMNS};
use crate::domain::{
    DomainError, DomainResult, EquipmentRecord, EquipmentRepositoryInterface, EquipmentTable,
};
use crate::shared::InfraError;

pub struct CsvEquipmentRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvEquipmentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<EquipmentTable, InfraError> {
        let sheet = csv_codec::decode(&self.path, bytes)?;
        if sheet.headers.iter().all(|h| h.is_empty()) {
            return Err(InfraError::malformed(&self.path, "missing header row"));
        }

        let rows = sheet
            .rows
            .into_iter()
            .map(|cells| {
                let mut record = EquipmentRecord::default();
                for (header, value) in sheet.headers.iter().zip(cells) {
                    if let Some(cell) = record.get_mut(header) {
                        *cell = value;
                    }
                }
                record
            })
            .collect();
        Ok(EquipmentTable::new(rows))
    }

    /// Caller holds `lock`.
    async fn write(&self, table: &EquipmentTable) -> DomainResult<()> {
        let bytes = csv_codec::encode(
            CANONICAL_COLUMNS,
            table.rows.iter().map(|row| row.cells()),
        )?;
        write_atomic(&self.path, &bytes).await?;
        info!(path = %self.path.display(), rows = table.len(), "Equipment table written");
        Ok(())
    }
}

#[async_trait]
impl EquipmentRepositoryInterface for CsvEquipmentRepository {
    async fn load(&self) -> DomainResult<EquipmentTable> {
        let bytes = read_optional(&self.path).await?.ok_or_else(|| {
            DomainError::FileNotFound(format!(
                "{} (equipment table not initialized)",
                self.path.display()
            ))
        })?;
        let table = self.decode(&bytes)?;
        debug!(path = %self.path.display(), rows = table.len(), "Equipment table loaded");
        Ok(table)
    }

    async fn update(&self, f: TableUpdate) -> DomainResult<EquipmentTable> {
        let _guard = self.lock.lock().await;
        let table = f(self.load().await)?;
        self.write(&table).await?;
        Ok(table)
    }
}
