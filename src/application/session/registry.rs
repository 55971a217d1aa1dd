//! In-memory session registry
//!
//! Sessions are keyed by an opaque id handed out at login. Nothing here
//! reads the user table, so a session keeps the snapshot taken at login.
//! Sessions older than the registry TTL are evicted on access, and every
//! login sweeps the rest.

use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::session::select_view;
use crate::domain::{DomainError, DomainResult, MenuEntry, Session};

pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Duration::hours(12))
    }
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    fn expired(&self, session: &Session) -> bool {
        session.opened_at + self.ttl <= Utc::now()
    }

    /// Store `session` under a fresh id and return the id.
    pub fn open(&self, session: Session) -> String {
        self.sweep();
        let id = Uuid::new_v4().to_string();
        debug!(session_id = %id, account_id = %session.user_id, "Session opened");
        self.sessions.insert(id.clone(), session);
        id
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        let session = self.sessions.get(id).map(|s| s.clone())?;
        if self.expired(&session) {
            self.sessions.remove(id);
            debug!(session_id = %id, "Session expired");
            return None;
        }
        Some(session)
    }

    /// Drop every expired session; returns how many were removed.
    pub fn sweep(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !self.expired(session));
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!(removed, "Expired sessions swept");
        }
        removed
    }

    /// Drop the session; unknown ids are ignored.
    pub fn close(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn select_view(&self, id: &str, entry: MenuEntry) -> DomainResult<Session> {
        if self.get(id).is_none() {
            return Err(DomainError::Unauthorized("Session expired".to_string()));
        }
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| DomainError::Unauthorized("Session expired".to_string()))?;
        select_view(&mut session, entry)?;
        Ok(session.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

pub type SharedSessionRegistry = Arc<SessionRegistry>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::default_admin_account;

    #[test]
    fn open_get_close() {
        let registry = SessionRegistry::default();
        let id = registry.open(Session::from_account(&default_admin_account()));
        assert_eq!(registry.get(&id).unwrap().user_id, "admin");
        assert!(registry.close(&id));
        assert!(!registry.close(&id));
        assert!(registry.get(&id).is_none());
    }

    #[test]
    fn select_view_updates_stored_session() {
        let registry = SessionRegistry::default();
        let id = registry.open(Session::from_account(&default_admin_account()));
        registry.select_view(&id, MenuEntry::AdminPanel).unwrap();
        assert_eq!(registry.get(&id).unwrap().active_view, MenuEntry::AdminPanel);
        assert!(registry.select_view("missing", MenuEntry::Home).is_err());
    }

    #[test]
    fn sessions_past_ttl_are_evicted() {
        let registry = SessionRegistry::new(Duration::hours(1));
        let mut stale = Session::from_account(&default_admin_account());
        stale.opened_at = Utc::now() - Duration::hours(2);
        let stale_id = registry.open(stale.clone());
        let fresh_id = registry.open(Session::from_account(&default_admin_account()));

        assert!(registry.get(&stale_id).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&fresh_id).is_some());

        let other_id = registry.open(stale);
        assert!(registry.select_view(&other_id, MenuEntry::Home).is_err());
        assert_eq!(registry.len(), 1);

        registry.sessions.get_mut(&fresh_id).unwrap().opened_at = Utc::now() - Duration::hours(3);
        registry.open(Session::from_account(&default_admin_account()));
        assert!(registry.get(&fresh_id).is_none());
        assert_eq!(registry.len(), 1);
    }
}
