//! Repair tickets as a JSON array

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::file_store::JsonFile;
use crate::domain::repair::next_ticket_number;
use crate::domain::{DomainResult, RepairRepositoryInterface, RepairTicket};

pub struct JsonRepairRepository {
    file: JsonFile<Vec<RepairTicket>>,
}

impl JsonRepairRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

#[async_trait]
impl RepairRepositoryInterface for JsonRepairRepository {
    async fn list(&self) -> DomainResult<Vec<RepairTicket>> {
        Ok(self.file.read().await?.unwrap_or_default())
    }

    async fn append(&self, mut draft: RepairTicket, local_now: NaiveDateTime) -> DomainResult<RepairTicket> {
        self.file
            .update(Vec::new, |tickets| {
                draft.ticket_no =
                    next_ticket_number(local_now, tickets.iter().map(|t| t.ticket_no.as_str()));
                tickets.push(draft.clone());
                Ok(draft)
            })
            .await
    }
}
