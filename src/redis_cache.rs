//! Redis cache backend
//!
//! Implements the [`Cache`] capability against a shared Redis instance, with
//! an optional per-entry time-to-live. Commands go through a connection
//! manager, so a dropped connection is re-established between calls rather
//! than surfacing on every subsequent operation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::error::BoxError;
use crate::read_through::{Cache, KeyValue};

/// Shared [`Cache`] implementation backed by Redis.
#[derive(Clone)]
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
    ttl: Option<Duration>,
}

impl RedisCache {
    /// Connect through a connection manager. Entries are stored without
    /// expiry; see [`with_ttl`](Self::with_ttl).
    pub async fn new(client: redis::Client) -> Result<Self, redis::RedisError> {
        let conn = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self { conn, ttl: None })
    }

    /// Expire stored entries after `ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn store_all(&self, pairs: Vec<KeyValue>) -> Result<(), BoxError> {
        let mut conn = self.conn.clone();
        for pair in pairs {
            match self.ttl {
                Some(ttl) => {
                    conn.set_ex::<_, _, ()>(&pair.key, pair.value, ttl.as_secs())
                        .await?;
                }
                None => {
                    conn.set::<_, _, ()>(&pair.key, pair.value).await?;
                }
            }
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BoxError> {
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<Vec<u8>>>(key).await?)
    }
}
