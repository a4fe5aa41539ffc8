use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_utils::phone::normalize_phone;

use crate::models::{PatientFields, PatientSession};
use crate::services::redis_session::RedisSessionStore;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Redis connection error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Session pool error: {0}")]
    Pool(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage for registrations that span several inbound messages.
///
/// Keys are normalised inside the store, so callers may pass raw sender addresses.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session for `phone`, empty if none exists yet.
    async fn get(&self, phone: &str) -> Result<PatientSession, SessionError>;

    /// Apply `fields` to the session and return the merged result.
    async fn merge(&self, phone: &str, fields: &PatientFields) -> Result<PatientSession, SessionError>;

    async fn clear(&self, phone: &str) -> Result<(), SessionError>;

    /// Drop sessions older than the TTL, returning how many were removed.
    async fn sweep(&self) -> Result<usize, SessionError>;
}

/// Process-local session map with TTL-based eviction.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, PatientSession>>,
    ttl: chrono::Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(1)),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn merge_at(&self, phone: &str, fields: &PatientFields, now: DateTime<Utc>) -> PatientSession {
        let key = normalize_phone(phone);
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(key.clone())
            .or_insert_with(|| PatientSession::new(&key));
        session.merge(fields, now);
        debug!("Updated registration session for {}: missing {:?}", key, session.missing_fields());
        session.clone()
    }

    pub async fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|phone, session| {
            let keep = session.last_updated >= cutoff;
            if !keep {
                debug!("Expiring registration session for {}", phone);
            }
            keep
        });
        before - sessions.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, phone: &str) -> Result<PatientSession, SessionError> {
        let key = normalize_phone(phone);
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&key)
            .cloned()
            .unwrap_or_else(|| PatientSession::new(&key)))
    }

    async fn merge(&self, phone: &str, fields: &PatientFields) -> Result<PatientSession, SessionError> {
        Ok(self.merge_at(phone, fields, Utc::now()).await)
    }

    async fn clear(&self, phone: &str) -> Result<(), SessionError> {
        let key = normalize_phone(phone);
        if self.sessions.write().await.remove(&key).is_some() {
            debug!("Cleared registration session for {}", key);
        }
        Ok(())
    }

    async fn sweep(&self) -> Result<usize, SessionError> {
        Ok(self.sweep_at(Utc::now()).await)
    }
}

/// Pick the Redis store when `REDIS_URL` is set, otherwise keep sessions in memory.
pub async fn build_session_store(config: &AppConfig) -> Arc<dyn SessionStore> {
    if let Some(redis_url) = &config.redis_url {
        match RedisSessionStore::connect(redis_url, config.session_ttl()).await {
            Ok(store) => {
                info!("Registration sessions stored in Redis");
                return Arc::new(store);
            }
            Err(e) => warn!("Redis session store unavailable ({}), falling back to memory", e),
        }
    }

    info!("Registration sessions stored in memory (ttl {:?})", config.session_ttl());
    Arc::new(InMemorySessionStore::new(config.session_ttl()))
}

/// Periodically evict expired sessions.
pub fn spawn_session_sweeper(store: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            match store.sweep().await {
                Ok(0) => {}
                Ok(removed) => info!("Swept {} expired registration sessions", removed),
                Err(e) => warn!("Session sweep failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::new(Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn get_returns_empty_session_without_creating_one() {
        let store = store();
        let session = store.get("whatsapp:+916362805484").await.unwrap();
        assert_eq!(session.phone_number, "6362805484");
        assert!(!session.has_any_field());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn merge_is_keyed_by_normalised_phone() {
        let store = store();
        store.merge("whatsapp:+916362805484", &PatientFields {
            name: Some("Asha".into()),
            ..Default::default()
        }).await.unwrap();
        let merged = store.merge("+91 636 280 5484", &PatientFields {
            gender: Some(Gender::Female),
            ..Default::default()
        }).await.unwrap();

        assert_eq!(merged.name.as_deref(), Some("Asha"));
        assert_eq!(merged.gender, Some(Gender::Female));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn clear_removes_session() {
        let store = store();
        store.merge("6362805484", &PatientFields { age: Some(30), ..Default::default() }).await.unwrap();
        store.clear("whatsapp:+916362805484").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn sweep_only_removes_expired_sessions() {
        let store = store();
        let now = Utc::now();
        store.merge_at("1111111111", &PatientFields { age: Some(30), ..Default::default() }, now - chrono::Duration::hours(2)).await;
        store.merge_at("2222222222", &PatientFields { age: Some(31), ..Default::default() }, now - chrono::Duration::minutes(10)).await;

        assert_eq!(store.sweep_at(now).await, 1);
        assert_eq!(store.get("2222222222").await.unwrap().age, Some(31));
        assert!(!store.get("1111111111").await.unwrap().has_any_field());
    }

    #[tokio::test]
    async fn concurrent_merges_are_not_lost() {
        let store = Arc::new(store());
        let a = {
            let store = store.clone();
            tokio::spawn(async move {
                store.merge("6362805484", &PatientFields { name: Some("Asha".into()), ..Default::default() }).await
            })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move {
                store.merge("6362805484", &PatientFields { age: Some(29), ..Default::default() }).await
            })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let session = store.get("6362805484").await.unwrap();
        assert_eq!(session.name.as_deref(), Some("Asha"));
        assert_eq!(session.age, Some(29));
    }
}
