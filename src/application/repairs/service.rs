//! Repair intake use-cases

use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::info;

use crate::domain::{
    DomainResult, RepairRepositoryInterface, RepairRequest, RepairTicket, Session,
};

pub struct RepairService {
    repo: Arc<dyn RepairRepositoryInterface>,
    departments: Vec<String>,
}

impl RepairService {
    pub fn new(repo: Arc<dyn RepairRepositoryInterface>, departments: Vec<String>) -> Self {
        Self { repo, departments }
    }

    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    pub async fn submit(&self, session: &Session, request: RepairRequest) -> DomainResult<RepairTicket> {
        let request = request.validated(&self.departments)?;
        let draft = RepairTicket {
            ticket_no: String::new(),
            equipment_id: request.equipment_id,
            department: request.department,
            description: request.description,
            submitted_by: session.user_id.clone(),
            submitted_at: Utc::now(),
        };
        let ticket = self.repo.append(draft, Local::now().naive_local()).await?;
        info!(
            ticket_no = %ticket.ticket_no,
            equipment_id = %ticket.equipment_id,
            department = %ticket.department,
            "Repair request accepted"
        );
        Ok(ticket)
    }

    /// Newest first.
    pub async fn list(&self) -> DomainResult<Vec<RepairTicket>> {
        let mut tickets = self.repo.list().await?;
        tickets.reverse();
        Ok(tickets)
    }
}
