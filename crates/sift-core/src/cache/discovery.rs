use crate::{
    cache::{CacheError, CacheStats, MetadataCache, TtlCache},
    schema::IndexMetadata,
};
use std::{sync::Arc, time::Duration};
use thiserror::Error as ThisError;
use tracing::debug;

///
/// DiscoveryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DiscoveryError {
    #[error("schema '{schema}' not found")]
    SchemaNotFound { schema: String },

    #[error("index '{schema}.{index}' not found")]
    IndexNotFound { schema: String, index: String },

    #[error("schema discovery unavailable: {message}")]
    Unavailable { message: String },

    #[error("name '{name}' matches several remote names: {}", candidates.join(", "))]
    AmbiguousName {
        name: String,
        candidates: Vec<String>,
    },
}

///
/// SchemaDiscovery
///
/// Read-only view of the remote store's schemas, indexes and mappings.
///

pub trait SchemaDiscovery: Send + Sync {
    fn list_schemas(&self) -> Result<Vec<String>, DiscoveryError>;

    fn list_tables(&self, schema: &str) -> Result<Vec<String>, DiscoveryError>;

    fn index_metadata(&self, schema: &str, index: &str) -> Result<IndexMetadata, DiscoveryError>;
}

impl<T: SchemaDiscovery + ?Sized> SchemaDiscovery for Arc<T> {
    fn list_schemas(&self) -> Result<Vec<String>, DiscoveryError> {
        (**self).list_schemas()
    }

    fn list_tables(&self, schema: &str) -> Result<Vec<String>, DiscoveryError> {
        (**self).list_tables(schema)
    }

    fn index_metadata(&self, schema: &str, index: &str) -> Result<IndexMetadata, DiscoveryError> {
        (**self).index_metadata(schema, index)
    }
}

///
/// CachingSchemaDiscovery
///
/// Caches every discovery request of `D`. With `cache_missing`, an
/// "index not found" answer is cached like a mapping until the next flush
/// or expiry.
///

pub struct CachingSchemaDiscovery<D> {
    inner: D,
    cache_missing: bool,
    schemas: TtlCache<(), Vec<String>>,
    tables: TtlCache<String, Vec<String>>,
    metadata: TtlCache<(String, String), Option<Arc<IndexMetadata>>>,
}

impl<D: SchemaDiscovery> CachingSchemaDiscovery<D> {
    #[must_use]
    pub fn new(inner: D, ttl: Duration, cache_missing: bool) -> Self {
        Self {
            inner,
            cache_missing,
            schemas: TtlCache::new("schemas", ttl),
            tables: TtlCache::new("tables", ttl),
            metadata: TtlCache::new("index_metadata", ttl),
        }
    }

    /// Mapping of one index, shared with every other caller of the entry.
    pub fn shared_index_metadata(
        &self,
        schema: &str,
        index: &str,
    ) -> Result<Arc<IndexMetadata>, DiscoveryError> {
        let key = (schema.to_string(), index.to_string());
        let entry = self.metadata.get_or_try_load(&key, || {
            match self.inner.index_metadata(schema, index) {
                Ok(metadata) => Ok(Some(Arc::new(metadata))),
                Err(DiscoveryError::IndexNotFound { .. }) if self.cache_missing => Ok(None),
                Err(err) => Err(err),
            }
        })?;

        match entry.as_ref() {
            Some(metadata) => Ok(Arc::clone(metadata)),
            None => Err(DiscoveryError::IndexNotFound {
                schema: key.0,
                index: key.1,
            }),
        }
    }

    /// Combined counters of the three request caches.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.schemas.stats() + self.tables.stats() + self.metadata.stats()
    }
}

impl<D: SchemaDiscovery> SchemaDiscovery for CachingSchemaDiscovery<D> {
    fn list_schemas(&self) -> Result<Vec<String>, DiscoveryError> {
        let schemas = self
            .schemas
            .get_or_try_load(&(), || self.inner.list_schemas())?;

        Ok(schemas.as_ref().clone())
    }

    fn list_tables(&self, schema: &str) -> Result<Vec<String>, DiscoveryError> {
        let tables = self
            .tables
            .get_or_try_load(&schema.to_string(), || self.inner.list_tables(schema))?;

        Ok(tables.as_ref().clone())
    }

    fn index_metadata(&self, schema: &str, index: &str) -> Result<IndexMetadata, DiscoveryError> {
        self.shared_index_metadata(schema, index)
            .map(Arc::unwrap_or_clone)
    }
}

impl<D: SchemaDiscovery> MetadataCache for CachingSchemaDiscovery<D> {
    fn flush_cache(&self) -> Result<(), CacheError> {
        self.schemas.invalidate_all();
        self.tables.invalidate_all();
        self.metadata.invalidate_all();
        debug!("schema discovery cache flushed");

        Ok(())
    }
}
