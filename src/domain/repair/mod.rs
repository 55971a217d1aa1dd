//! Repair intake

pub mod model;

use async_trait::async_trait;
use chrono::NaiveDateTime;

pub use model::{next_ticket_number, RepairRequest, RepairTicket};

use crate::domain::DomainResult;

#[async_trait]
pub trait RepairRepositoryInterface: Send + Sync {
    /// Tickets in submission order.
    async fn list(&self) -> DomainResult<Vec<RepairTicket>>;

    /// Number `draft` from `local_now` against the stored tickets and
    /// persist it, as one read-modify-write step.
    async fn append(&self, draft: RepairTicket, local_now: NaiveDateTime) -> DomainResult<RepairTicket>;
}
