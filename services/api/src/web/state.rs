//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-session snapshot store.

use crate::config::Config;
use doc_simplifier_core::{DocumentPipeline, SessionSnapshot};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<DocumentPipeline>,
    pub sessions: Arc<SessionStore>,
}

//=========================================================================================
// SessionStore (One Snapshot Per Browser Session)
//=========================================================================================

struct StoredSession {
    snapshot: SessionSnapshot,
    written_at: Instant,
}

/// Holds the latest snapshot of every session.
///
/// A snapshot is only ever replaced wholesale, so readers never see a
/// half-updated session. A session not written for `idle_ttl` has ended: it
/// reads as absent and is dropped on the next write to the store.
pub struct SessionStore {
    idle_ttl: Duration,
    snapshots: RwLock<HashMap<Uuid, StoredSession>>,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            idle_ttl,
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub fn get(&self, id: &Uuid) -> Option<SessionSnapshot> {
        self.snapshots
            .read()
            .get(id)
            .filter(|stored| stored.written_at.elapsed() < self.idle_ttl)
            .map(|stored| stored.snapshot.clone())
    }

    pub fn replace(&self, id: Uuid, snapshot: SessionSnapshot) {
        let mut snapshots = self.snapshots.write();
        let idle_ttl = self.idle_ttl;
        snapshots.retain(|_, stored| stored.written_at.elapsed() < idle_ttl);
        snapshots.insert(
            id,
            StoredSession {
                snapshot,
                written_at: Instant::now(),
            },
        );
    }

    /// Returns true if a live session was removed.
    pub fn remove(&self, id: &Uuid) -> bool {
        self.snapshots
            .write()
            .remove(id)
            .is_some_and(|stored| stored.written_at.elapsed() < self.idle_ttl)
    }

    /// Counts stored sessions, including ended ones not yet swept.
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}
