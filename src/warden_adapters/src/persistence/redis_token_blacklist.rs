use chrono::Utc;
use redis::aio::MultiplexedConnection;
use warden_core::{TokenBlacklist, TokenBlacklistError};

use crate::config::redis_keys::BLACKLISTED_TOKEN_KEY_PREFIX;

/// Revocation set in Redis. Keys expire after `ttl_secs`, which should be at
/// least the longest token lifetime.
#[derive(Clone)]
pub struct RedisTokenBlacklist {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisTokenBlacklist {
    pub fn new(conn: MultiplexedConnection, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }
}

#[async_trait::async_trait]
impl TokenBlacklist for RedisTokenBlacklist {
    async fn add(&self, token: &str) -> Result<(), TokenBlacklistError> {
        let mut conn = self.conn.clone();

        // NX keeps the first timestamp; a repeated add is a no-op.
        let _: Option<String> = redis::cmd("SET")
            .arg(get_key(token))
            .arg(Utc::now().timestamp())
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e| TokenBlacklistError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, TokenBlacklistError> {
        let mut conn = self.conn.clone();

        redis::cmd("EXISTS")
            .arg(get_key(token))
            .query_async(&mut conn)
            .await
            .map_err(|e| TokenBlacklistError::DatabaseError(e.to_string()))
    }
}

fn get_key(token: &str) -> String {
    format!("{}{}", BLACKLISTED_TOKEN_KEY_PREFIX, token)
}
