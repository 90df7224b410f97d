//! Per-session key-value state.
//!
//! Sessions are JSON maps keyed by the session cookie value. The store is
//! injected so the Redis backend can be swapped for the in-process one.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::AppResult;

pub type SessionData = serde_json::Map<String, Value>;

/// Session key of the home page visit counter
pub const VISITS_KEY: &str = "num_visits";

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Session contents; an unknown id yields an empty map
    async fn load(&self, session_id: &str) -> AppResult<SessionData>;

    async fn save(&self, session_id: &str, data: &SessionData) -> AppResult<()>;
}

/// In-process store, for development and tests
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionData>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> AppResult<SessionData> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    async fn save(&self, session_id: &str, data: &SessionData) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.to_string(), data.clone());
        Ok(())
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Bump the visit counter; returns the count before this visit
    pub async fn record_visit(&self, session_id: &str) -> AppResult<u64> {
        let mut data = self.store.load(session_id).await?;
        let visits = data.get(VISITS_KEY).and_then(Value::as_u64).unwrap_or(0);
        data.insert(VISITS_KEY.to_string(), Value::from(visits + 1));
        self.store.save(session_id, &data).await?;

        tracing::debug!("Session {} visit #{}", session_id, visits + 1);
        Ok(visits)
    }
}
