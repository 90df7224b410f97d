//! Redis-backed session store

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};

use super::session::{SessionData, SessionStore};

#[derive(Clone)]
pub struct RedisSessionStore {
    client: Client,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    /// Create a new Redis session store
    pub async fn new(url: &str, ttl_seconds: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Session(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Session(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Session(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { client, ttl_seconds })
    }

    fn key(session_id: &str) -> String {
        format!("session:{}", session_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, session_id: &str) -> AppResult<SessionData> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let raw: Option<String> = conn.get(Self::key(session_id)).await?;

        match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(data) => Ok(data),
                Err(e) => {
                    tracing::warn!("Discarding unreadable session {}: {}", session_id, e);
                    Ok(SessionData::new())
                }
            },
            None => Ok(SessionData::new()),
        }
    }

    async fn save(&self, session_id: &str, data: &SessionData) -> AppResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let raw = serde_json::to_string(data)
            .map_err(|e| AppError::Internal(format!("Failed to serialize session: {}", e)))?;
        conn.set_ex::<_, _, ()>(Self::key(session_id), raw, self.ttl_seconds)
            .await?;

        Ok(())
    }
}
