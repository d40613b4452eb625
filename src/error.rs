//! Cache layer error types

use crate::key::NoIdentityField;

/// Boxed error type used at every capability boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced to callers of the read-through coordinator.
///
/// Cache I/O faults never appear here: the cache is an optimization, not a
/// dependency for correctness, so read and write failures against it degrade
/// to the database path with a log line. Absence of the requested entity is
/// `Ok(false)`, never an error.
#[derive(Debug, thiserror::Error)]
pub enum CacheLayerError {
    /// No cache key could be derived for the entity.
    #[error(transparent)]
    NoIdentityField(#[from] NoIdentityField),

    /// A cached payload exists but cannot be decoded into the entity.
    /// Unlike cache I/O faults, a corrupt payload is not silently ignored.
    #[error("failed to deserialize cached payload for key `{key}`: {source}")]
    Deserialize {
        /// The cache key whose payload failed to decode.
        key: String,
        /// The serializer's error.
        source: BoxError,
    },

    /// The database capability failed; propagated unchanged.
    #[error("database error: {0}")]
    Database(#[from] BoxError),
}
