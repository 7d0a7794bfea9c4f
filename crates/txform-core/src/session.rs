//! In-memory store of open form sessions

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::form::FormSession;

/// Open form sessions keyed by id, expired after a period of inactivity
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<Uuid, FormSession>,
    ttl: Duration,
}

impl SessionStore {
    /// Create an empty store whose sessions expire after `ttl` without activity
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Open a new session and return its id
    pub fn create(&mut self, now: DateTime<Utc>) -> Uuid {
        let session = FormSession::new(now);
        let id = session.id;
        self.sessions.insert(id, session);
        id
    }

    /// Look up a session
    pub fn get(&self, id: &Uuid) -> CoreResult<&FormSession> {
        self.sessions.get(id).ok_or_else(|| not_found(id))
    }

    /// Look up a session for modification
    pub fn get_mut(&mut self, id: &Uuid) -> CoreResult<&mut FormSession> {
        self.sessions.get_mut(id).ok_or_else(|| not_found(id))
    }

    /// Drop sessions idle for longer than the TTL, returning how many were removed
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| now - s.last_active <= ttl);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn not_found(id: &Uuid) -> CoreError {
    CoreError::SessionNotFound { id: id.to_string() }
}
