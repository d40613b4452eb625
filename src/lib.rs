//! entrycache - read-through entity caching layer
//!
//! Sits between application code and a backing data store: callers ask for a
//! logical entity by its identity fields, the layer checks a cache, falls
//! back to the store on a miss, and fills the cache for subsequent lookups.
//!
//! The layer provides:
//! - Deterministic cache keys derived from annotated identity fields
//! - A fail-open error policy: cache faults degrade to the database path
//! - Best-effort batch population for bulk warm-up
//! - Pluggable cache, database, serializer, and logger capabilities
//! - Ready-made in-process (moka) and Redis cache backends
//! - Literal SQL rendering helpers for database implementations
//!
//! ```no_run
//! use entrycache::{
//!     CacheEntry, Database, EntryField, MemoryCache, ReadThroughCache, async_trait,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Relation {
//!     relate_id: i64,
//!     source_id: i64,
//! }
//!
//! impl CacheEntry for Relation {
//!     fn entry_name() -> &'static str {
//!         "Relation"
//!     }
//!
//!     fn entry_fields(&self) -> Vec<EntryField> {
//!         vec![
//!             EntryField::tagged("relate_id", &[("cache", "relateId")], self.relate_id),
//!             EntryField::tagged("source_id", &[("cache", "sourceId")], self.source_id),
//!         ]
//!     }
//! }
//!
//! struct RelationDb;
//!
//! #[async_trait]
//! impl Database<Relation> for RelationDb {
//!     async fn get_entry(&self, entry: &mut Relation) -> Result<bool, entrycache::BoxError> {
//!         // Query the real store here; identity fields are already set.
//!         Ok(false)
//!     }
//! }
//!
//! # async fn run() -> Result<(), entrycache::CacheLayerError> {
//! let layer = ReadThroughCache::builder(MemoryCache::default(), RelationDb)
//!     .namespace("svc")
//!     .build();
//!
//! let mut relation = Relation {
//!     relate_id: 1,
//!     source_id: 2,
//! };
//! let found = layer.get_entry(&mut relation).await?;
//! # Ok(())
//! # }
//! ```

mod entry;
mod error;
mod key;
mod log;
mod memory_cache;
mod query;
mod read_through;
mod redis_cache;
mod serialize;

pub use entry::{CacheEntry, EntryField, FieldValue};
pub use error::{BoxError, CacheLayerError};
pub use key::{KeyComponent, KeyConfig, NoIdentityField, entry_cache_key, entry_cache_keys};
pub use log::{Logger, TracingLogger};
pub use memory_cache::{MemoryCache, MemoryCacheConfig};
pub use query::{QueryArg, render_count_query, render_query};
pub use read_through::{Cache, Database, KeyValue, ReadThroughCache, ReadThroughCacheBuilder};
pub use redis_cache::RedisCache;
pub use serialize::{JsonSerializer, Serializer};

// Re-export async_trait for implementing the capability traits.
pub use async_trait::async_trait;
