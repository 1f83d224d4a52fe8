//! Module: cache
//! Responsibility: time-bounded caches over schema discovery and identifier
//! mapping, and the flush contract they share.
//! Does not own: talking to the remote store; `SchemaDiscovery` is supplied.
//! Boundary: entries are whole values behind `Arc`; a reader sees either a
//! complete pre-flush entry or a miss, never a partial one.

mod discovery;
mod identifier;
mod ttl;

#[cfg(test)]
mod tests;

pub use discovery::{CachingSchemaDiscovery, DiscoveryError, SchemaDiscovery};
pub use identifier::CachingIdentifierMapping;
pub use ttl::{CacheStats, TtlCache};

use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// CacheError
///

#[derive(Debug, ThisError)]
pub enum CacheError {
    #[error("cache '{cache}' could not be flushed: {message}")]
    FlushFailed { cache: String, message: String },
}

///
/// MetadataCache
///
/// Anything holding discovered metadata that an operator can invalidate.
///

pub trait MetadataCache: Send + Sync {
    fn flush_cache(&self) -> Result<(), CacheError>;
}

impl<T: MetadataCache + ?Sized> MetadataCache for Arc<T> {
    fn flush_cache(&self) -> Result<(), CacheError> {
        (**self).flush_cache()
    }
}
