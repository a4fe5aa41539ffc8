use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use deadpool_redis::{Config, Connection, Pool, Runtime};
use tracing::debug;

use shared_utils::phone::normalize_phone;

use crate::models::{PatientFields, PatientSession};
use crate::services::session::{SessionError, SessionStore};

const KEY_PREFIX: &str = "patient_session:";

/// Sessions shared across instances; Redis expires them, so `sweep` is a no-op.
pub struct RedisSessionStore {
    pool: Pool,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str, ttl: Duration) -> Result<Self, SessionError> {
        let pool = Config::from_url(redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| SessionError::Pool(format!("Pool creation error: {}", e)))?;

        let store = Self {
            pool,
            ttl_secs: ttl.as_secs().max(1),
        };

        let mut conn = store.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        Ok(store)
    }

    async fn connection(&self) -> Result<Connection, SessionError> {
        self.pool
            .get()
            .await
            .map_err(|e| SessionError::Pool(format!("Connection error: {}", e)))
    }

    fn key(phone: &str) -> String {
        format!("{}{}", KEY_PREFIX, normalize_phone(phone))
    }

    async fn load(&self, conn: &mut Connection, key: &str) -> Result<Option<PatientSession>, SessionError> {
        let raw: Option<String> = redis::cmd("GET").arg(key).query_async(conn).await?;
        raw.map(|data| serde_json::from_str(&data))
            .transpose()
            .map_err(SessionError::from)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, phone: &str) -> Result<PatientSession, SessionError> {
        let mut conn = self.connection().await?;
        let session = self.load(&mut conn, &Self::key(phone)).await?;
        Ok(session.unwrap_or_else(|| PatientSession::new(&normalize_phone(phone))))
    }

    async fn merge(&self, phone: &str, fields: &PatientFields) -> Result<PatientSession, SessionError> {
        let key = Self::key(phone);
        let mut conn = self.connection().await?;

        let mut session = self
            .load(&mut conn, &key)
            .await?
            .unwrap_or_else(|| PatientSession::new(&normalize_phone(phone)));
        session.merge(fields, Utc::now());

        let payload = serde_json::to_string(&session)?;
        let _: () = redis::cmd("SET")
            .arg(&key)
            .arg(payload)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut conn)
            .await?;

        debug!("Stored registration session {}", key);
        Ok(session)
    }

    async fn clear(&self, phone: &str) -> Result<(), SessionError> {
        let mut conn = self.connection().await?;
        let _: i64 = redis::cmd("DEL").arg(Self::key(phone)).query_async(&mut conn).await?;
        Ok(())
    }

    async fn sweep(&self) -> Result<usize, SessionError> {
        Ok(0)
    }
}
