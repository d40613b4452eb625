//! Read-through coordinator
//!
//! Orchestrates a single entity lookup: cache first, database on a miss,
//! cache population after a successful fetch. The error policy is fail-open
//! with respect to the cache: an unreachable or failing cache degrades to the
//! database path with a log line and never aborts the read.
//!
//! Concurrent first-time lookups for the same key are not deduplicated: each
//! miss queries the database and issues its own store-back, and the last
//! write wins. Store-backs are idempotent for fixed underlying data, so the
//! overlap costs extra database reads, not correctness.

use async_trait::async_trait;

use crate::entry::CacheEntry;
use crate::error::{BoxError, CacheLayerError};
use crate::key::{KeyConfig, entry_cache_key};
use crate::log::{Logger, TracingLogger};
use crate::serialize::{JsonSerializer, Serializer};

/// A key with its serialized payload, as stored in the cache backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Cache key.
    pub key: String,
    /// Serialized entity payload.
    pub value: Vec<u8>,
}

/// Cache backend capability.
///
/// Implementations must be safe for concurrent use; the coordinator imposes
/// no locking of its own.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Store all pairs.
    async fn store_all(&self, pairs: Vec<KeyValue>) -> Result<(), BoxError>;

    /// Look up the payload stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BoxError>;
}

/// Database capability for one entity type.
#[async_trait]
pub trait Database<E>: Send + Sync {
    /// Query for the entity whose identity fields are set on `entry`.
    ///
    /// On success the result is written through `entry`; the return value
    /// reports whether a matching record existed.
    async fn get_entry(&self, entry: &mut E) -> Result<bool, BoxError>;
}

/// Read-through cache coordinator.
///
/// Holds no mutable state across calls beyond the captured configuration, so
/// any number of lookups may run concurrently as long as the injected cache
/// and database capabilities are themselves safe for concurrent use.
pub struct ReadThroughCache<C, D, S = JsonSerializer, L = TracingLogger> {
    cache: C,
    database: D,
    serializer: S,
    log: L,
    keys: KeyConfig,
}

impl<C, D> ReadThroughCache<C, D> {
    /// Start building a coordinator over the given capabilities.
    pub fn builder(cache: C, database: D) -> ReadThroughCacheBuilder<C, D> {
        ReadThroughCacheBuilder {
            cache,
            database,
            serializer: JsonSerializer,
            log: TracingLogger,
            keys: KeyConfig::default(),
        }
    }
}

impl<C, D, S, L> ReadThroughCache<C, D, S, L>
where
    C: Cache,
    S: Serializer,
    L: Logger,
{
    /// Key derivation settings this coordinator was built with.
    ///
    /// Batch key utilities should pass this same value to
    /// [`entry_cache_keys`](crate::key::entry_cache_keys) so standalone
    /// derivations agree with the coordinator's.
    pub fn key_config(&self) -> &KeyConfig {
        &self.keys
    }

    /// Look up one entity, reading through to the database on a cache miss.
    ///
    /// The caller sets the identity fields; on a hit or a successful fetch
    /// the entity is overwritten in place. `Ok(false)` is the normal "does
    /// not exist" outcome, distinct from any error. A corrupt cached payload
    /// surfaces as [`CacheLayerError::Deserialize`]; cache I/O faults are
    /// logged and treated as misses.
    pub async fn get_entry<E>(&self, entry: &mut E) -> Result<bool, CacheLayerError>
    where
        E: CacheEntry,
        D: Database<E>,
    {
        let key = entry_cache_key(&self.keys, entry)?;

        let cached = match self.cache.get(&key).await {
            Ok(value) => value,
            Err(e) => {
                // Fail open: cache unavailability never aborts the read.
                self.log.warn(format_args!(
                    "Cache get failed for key {}: {}. Falling back to database.",
                    key, e
                ));
                None
            }
        };

        if let Some(bytes) = cached {
            self.log.debug(format_args!("Cache hit for key: {}", key));
            return match self.serializer.deserialize(&bytes, entry) {
                Ok(()) => Ok(true),
                Err(source) => Err(CacheLayerError::Deserialize { key, source }),
            };
        }

        self.log.debug(format_args!("Cache miss for key: {}", key));
        let found = self
            .database
            .get_entry(entry)
            .await
            .map_err(CacheLayerError::Database)?;
        if found {
            self.store_back(key, entry).await;
        }
        Ok(found)
    }

    /// Bulk cache population.
    ///
    /// Entities that fail key derivation or serialization are logged and
    /// skipped; the remaining pairs go out in one aggregate store. A failure
    /// of the aggregate store is logged only, with no per-entity retry.
    pub async fn store_batch<E: CacheEntry>(&self, entries: &[E]) {
        let mut pairs = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = match entry_cache_key(&self.keys, entry) {
                Ok(key) => key,
                Err(e) => {
                    self.log
                        .warn(format_args!("Skipping entry without identity: {}", e));
                    continue;
                }
            };
            match self.serializer.serialize(entry) {
                Ok(value) => pairs.push(KeyValue { key, value }),
                Err(e) => {
                    self.log.error(format_args!(
                        "Failed to serialize entry for key {}: {}",
                        key, e
                    ));
                }
            }
        }
        if pairs.is_empty() {
            return;
        }
        if let Err(e) = self.cache.store_all(pairs).await {
            self.log.error(format_args!("Cache store failed: {}", e));
        }
    }

    /// Serialize and store one freshly fetched entity. Best effort: a failed
    /// cache write must not fail a successful read.
    async fn store_back<E: CacheEntry>(&self, key: String, entry: &E) {
        let value = match self.serializer.serialize(entry) {
            Ok(value) => value,
            Err(e) => {
                self.log.error(format_args!(
                    "Failed to serialize entry for key {}: {}",
                    key, e
                ));
                return;
            }
        };
        if let Err(e) = self.cache.store_all(vec![KeyValue { key, value }]).await {
            self.log.error(format_args!("Cache store failed: {}", e));
        }
    }
}

/// Builder for [`ReadThroughCache`].
///
/// Unset options default to: empty namespace prefix, annotation name `cache`,
/// [`JsonSerializer`], [`TracingLogger`]. Settings are captured by `build`
/// and immutable for the coordinator's lifetime.
pub struct ReadThroughCacheBuilder<C, D, S = JsonSerializer, L = TracingLogger> {
    cache: C,
    database: D,
    serializer: S,
    log: L,
    keys: KeyConfig,
}

impl<C, D, S, L> ReadThroughCacheBuilder<C, D, S, L> {
    /// Namespace prefix disambiguating keys across services sharing a cache.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.keys = self.keys.with_namespace(namespace);
        self
    }

    /// Annotation name that marks identity fields (default `cache`).
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.keys = self.keys.with_tag(tag);
        self
    }

    /// Replace the payload codec.
    pub fn serializer<S2>(self, serializer: S2) -> ReadThroughCacheBuilder<C, D, S2, L> {
        ReadThroughCacheBuilder {
            cache: self.cache,
            database: self.database,
            serializer,
            log: self.log,
            keys: self.keys,
        }
    }

    /// Replace the diagnostic sink.
    pub fn logger<L2>(self, log: L2) -> ReadThroughCacheBuilder<C, D, S, L2> {
        ReadThroughCacheBuilder {
            cache: self.cache,
            database: self.database,
            serializer: self.serializer,
            log,
            keys: self.keys,
        }
    }

    /// Finish construction.
    pub fn build(self) -> ReadThroughCache<C, D, S, L> {
        ReadThroughCache {
            cache: self.cache,
            database: self.database,
            serializer: self.serializer,
            log: self.log,
            keys: self.keys,
        }
    }
}
