//! In-process cache backend
//!
//! A moka-backed implementation of the [`Cache`] capability: bounded
//! capacity, per-entry time-to-live, no cross-process sharing. Suitable on
//! its own for single-instance deployments, or as a local tier in front of a
//! shared backend.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::read_through::{Cache, KeyValue};

/// Configuration for [`MemoryCache`].
#[derive(Debug, Clone)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries.
    pub max_capacity: u64,
    /// Time-to-live for entries.
    pub ttl: Duration,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

/// In-process [`Cache`] implementation. Operations never fail.
#[derive(Clone)]
pub struct MemoryCache {
    inner: moka::future::Cache<String, Vec<u8>>,
}

impl MemoryCache {
    /// Create a cache with the given bounds.
    pub fn new(config: MemoryCacheConfig) -> Self {
        let inner = moka::future::Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();
        Self { inner }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(MemoryCacheConfig::default())
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn store_all(&self, pairs: Vec<KeyValue>) -> Result<(), BoxError> {
        for pair in pairs {
            self.inner.insert(pair.key, pair.value).await;
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BoxError> {
        Ok(self.inner.get(key).await)
    }
}
