//! In-memory session store.
//!
//! Each session sits behind its own mutex, so mutations are serialized per
//! session id while distinct sessions proceed fully in parallel. Lock order
//! is always map first, then session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::model::Session;

/// A session behind its per-id lock.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Injectable store abstraction over session lifecycle.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the session for `id`, creating a fresh one if the id is
    /// unknown or only a terminated session (awaiting purge) remains.
    async fn get_or_create(&self, id: &str) -> SessionHandle;

    /// Look up an existing session.
    async fn get(&self, id: &str) -> Option<SessionHandle>;

    /// Remove a session. Idempotent: returns false if the id was absent.
    async fn remove(&self, id: &str) -> bool;

    /// Remove a session only if the stored entry is still `handle`.
    ///
    /// Delivery tasks purge by identity, not by key: if the id has already
    /// been replaced by a fresh session (the scammer kept talking while the
    /// callback was in flight), the new session must survive.
    async fn remove_if(&self, id: &str, handle: &SessionHandle) -> bool;

    /// Number of sessions currently held (terminated sessions leave the
    /// store once their callback attempt completes).
    async fn active_count(&self) -> usize;

    /// Remove sessions idle for longer than `idle_after`. Returns how many
    /// were swept.
    async fn sweep_idle(&self, idle_after: Duration) -> usize;
}

/// Process-memory store keyed by session id.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl InMemorySessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
        })
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, id: &str) -> SessionHandle {
        // Fast path: live session already present
        {
            let map = self.sessions.read().await;
            if let Some(existing) = map.get(id) {
                if existing.lock().await.active {
                    return Arc::clone(existing);
                }
            }
        }

        let mut map = self.sessions.write().await;
        if let Some(existing) = map.get(id) {
            if existing.lock().await.active {
                return Arc::clone(existing);
            }
            // Terminated but not yet purged: the id starts over fresh
            debug!(session_id = %id, "Replacing terminated session with a fresh one");
        }

        let fresh: SessionHandle = Arc::new(Mutex::new(Session::new(id)));
        map.insert(id.to_string(), Arc::clone(&fresh));
        info!(session_id = %id, "Session created");
        fresh
    }

    async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            debug!(session_id = %id, "Session removed from store");
        }
        removed
    }

    async fn remove_if(&self, id: &str, handle: &SessionHandle) -> bool {
        let mut map = self.sessions.write().await;
        match map.get(id) {
            Some(existing) if Arc::ptr_eq(existing, handle) => {
                map.remove(id);
                debug!(session_id = %id, "Session removed from store");
                true
            }
            _ => {
                debug!(session_id = %id, "Skipping purge, session was replaced or already gone");
                false
            }
        }
    }

    async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn sweep_idle(&self, idle_after: Duration) -> usize {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(idle_after).unwrap_or(chrono::Duration::zero());

        let mut map = self.sessions.write().await;
        let mut stale = Vec::new();
        for (id, handle) in map.iter() {
            // Per-session lock before deciding; a concurrent mutation that
            // touched the session makes it fresh again
            let session = handle.lock().await;
            if session.last_activity < cutoff {
                stale.push(id.clone());
            }
        }

        for id in &stale {
            map.remove(id);
            info!(session_id = %id, "Idle session swept");
        }
        stale.len()
    }
}

/// Spawn the periodic idle sweep (runs every `interval`).
pub fn spawn_sweep_task(
    store: Arc<dyn SessionStore>,
    interval: Duration,
    idle_after: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let swept = store.sweep_idle(idle_after).await;
            if swept > 0 {
                info!(swept, "Idle sweep removed sessions");
            }
        }
    })
}
