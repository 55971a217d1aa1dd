//! Asset registry use-cases

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    AssetMetrics, DepartmentGroup, DomainResult, EquipmentRepositoryInterface, EquipmentTable,
    GridEdit,
};

/// Table plus the figures shown above it.
#[derive(Debug, Clone)]
pub struct AssetOverview {
    pub table: EquipmentTable,
    pub metrics: AssetMetrics,
}

pub struct AssetService {
    repo: Arc<dyn EquipmentRepositoryInterface>,
    reference_year: i32,
}

impl AssetService {
    pub fn new(repo: Arc<dyn EquipmentRepositoryInterface>, reference_year: i32) -> Self {
        Self {
            repo,
            reference_year,
        }
    }

    pub async fn load(&self) -> DomainResult<EquipmentTable> {
        self.repo.load().await
    }

    pub async fn overview(&self) -> DomainResult<AssetOverview> {
        let table = self.repo.load().await?;
        let metrics = AssetMetrics::compute(&table, self.reference_year);
        Ok(AssetOverview { table, metrics })
    }

    pub async fn metrics(&self) -> DomainResult<AssetMetrics> {
        Ok(self.overview().await?.metrics)
    }

    pub async fn grouped(&self) -> DomainResult<Vec<DepartmentGroup>> {
        Ok(self.repo.load().await?.group_by_department())
    }

    /// Validate, renumber and overwrite the whole file. Statuses already
    /// stored are accepted as they are; new ones must be allowed values.
    pub async fn save(&self, mut table: EquipmentTable) -> DomainResult<EquipmentTable> {
        let table = self
            .repo
            .update(Box::new(move |current| {
                table.validate_statuses(current.ok().as_ref())?;
                table.renumber();
                Ok(table)
            }))
            .await?;
        metrics::counter!("portal_equipment_saves_total").increment(1);
        info!(rows = table.len(), "Equipment table saved");
        Ok(table)
    }

    /// Apply grid edits to the stored table in order, then save. The file
    /// is left untouched if any edit fails.
    pub async fn apply_edits(&self, edits: Vec<GridEdit>) -> DomainResult<EquipmentTable> {
        let count = edits.len();
        let table = self
            .repo
            .update(Box::new(move |current| {
                let mut table = current?;
                for edit in edits {
                    table.apply(edit)?;
                }
                table.renumber();
                Ok(table)
            }))
            .await?;
        metrics::counter!("portal_equipment_saves_total").increment(1);
        info!(rows = table.len(), edits = count, "Grid edits saved");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, EquipmentRecord};
    use crate::infrastructure::CsvEquipmentRepository;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> AssetService {
        AssetService::new(
            Arc::new(CsvEquipmentRepository::new(dir.path().join("equipment.csv"))),
            2025,
        )
    }

    fn record(department: &str, status: &str) -> EquipmentRecord {
        EquipmentRecord {
            department: department.into(),
            status: status.into(),
            sequence_number: "99".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn load_without_file_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(service(&dir).overview().await, Err(DomainError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn save_renumbers_and_persists() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let saved = svc
            .save(EquipmentTable::new(vec![record("ICU", "normal"), record("", "")]))
            .await
            .unwrap();
        assert_eq!(saved.rows[1].sequence_number, "2");

        let overview = svc.overview().await.unwrap();
        assert_eq!(overview.table, saved);
        assert_eq!(overview.metrics.in_service, 1);
        assert_eq!(overview.metrics.department_count, 1);
    }

    #[tokio::test]
    async fn invalid_status_is_not_written() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let err = svc
            .save(EquipmentTable::new(vec![record("ICU", "broken")]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(!dir.path().join("equipment.csv").exists());
    }

    #[tokio::test]
    async fn edits_apply_in_order_and_failures_keep_file() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        svc.save(EquipmentTable::new(vec![record("ICU", ""), record("OR", "")]))
            .await
            .unwrap();

        let table = svc
            .apply_edits(vec![
                GridEdit::DeleteRow { index: 0 },
                GridEdit::AddRow,
                GridEdit::SetCell {
                    index: 1,
                    column: "status".into(),
                    value: "sealed".into(),
                },
            ])
            .await
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].department, "OR");
        assert_eq!(table.rows[1].sequence_number, "2");

        let failed = svc.apply_edits(vec![GridEdit::AddRow, GridEdit::DeleteRow { index: 9 }]).await;
        assert!(failed.is_err());
        assert_eq!(svc.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn imported_free_text_status_does_not_block_edits() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        std::fs::write(
            dir.path().join("equipment.csv"),
            "department,equipment-name,status\nICU,monitor,in use\n",
        )
        .unwrap();

        let table = svc
            .apply_edits(vec![GridEdit::SetCell {
                index: 0,
                column: "notes".into(),
                value: "checked".into(),
            }])
            .await
            .unwrap();
        assert_eq!(table.rows[0].status, "in use");
        assert_eq!(table.rows[0].notes, "checked");

        let mut resaved = svc.load().await.unwrap();
        resaved.rows.push(record("OR", ""));
        assert!(svc.save(resaved.clone()).await.is_ok());

        resaved.rows[1].status = "broken".into();
        let err = svc.save(resaved).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = svc
            .apply_edits(vec![GridEdit::SetCell {
                index: 0,
                column: "status".into(),
                value: "broken".into(),
            }])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(svc.load().await.unwrap().rows[0].status, "in use");
    }

    #[tokio::test]
    async fn concurrent_edits_are_all_kept() {
        let dir = TempDir::new().unwrap();
        let svc = Arc::new(service(&dir));
        svc.save(EquipmentTable::default()).await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.apply_edits(vec![GridEdit::AddRow]).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let table = svc.load().await.unwrap();
        assert_eq!(table.len(), 20);
        assert_eq!(table.rows[19].sequence_number, "20");
    }

    #[tokio::test]
    async fn grouped_view_puts_unclassified_last() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        svc.save(EquipmentTable::new(vec![record("", ""), record("ICU", "")]))
            .await
            .unwrap();
        let groups = svc.grouped().await.unwrap();
        assert_eq!(groups[0].department, "ICU");
        assert_eq!(groups[1].department, "unclassified");
    }
}
