use async_trait::async_trait;
use deadpool_redis::{Config as RedisPoolConfig, Pool, Runtime};
use redis::AsyncCommands;

use crate::{errors::AuthError, repositories::token::SessionRevocationRepository};

const SESSION_DENY_PREFIX: &str = "session_deny";

#[derive(Clone)]
pub struct RedisSessionRevocations {
    pool: Pool,
}

impl RedisSessionRevocations {
    pub fn connect(url: &str) -> Result<Self, AuthError> {
        let pool = RedisPoolConfig::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AuthError::SessionStore(e.to_string()))?;

        Ok(RedisSessionRevocations { pool })
    }

    fn key(session_id: &str) -> String {
        format!("{SESSION_DENY_PREFIX}:{session_id}")
    }
}

#[async_trait]
impl SessionRevocationRepository for RedisSessionRevocations {
    async fn revoke(&self, session_id: &str, ttl_seconds: u64) -> Result<(), AuthError> {
        if ttl_seconds == 0 {
            return Ok(());
        }
        let mut conn = self.pool.get().await?;
        let _: () = conn.set_ex(Self::key(session_id), 1u8, ttl_seconds).await?;
        Ok(())
    }

    async fn is_revoked(&self, session_id: &str) -> Result<bool, AuthError> {
        let mut conn = self.pool.get().await?;
        let exists: bool = conn.exists(Self::key(session_id)).await?;
        Ok(exists)
    }

    async fn ping(&self) -> Result<(), AuthError> {
        let mut conn = self.pool.get().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(AuthError::SessionStore(format!("unexpected PING reply: {pong}")))
        }
    }
}
