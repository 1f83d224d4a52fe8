use crate::{
    cache::{CacheError, DiscoveryError, MetadataCache, SchemaDiscovery},
    schema::{IndexField, IndexMetadata, IndexType},
};
use std::{
    collections::BTreeMap,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

///
/// FakeDiscovery
///
/// In-memory schema discovery that counts every request it answers.
///

#[derive(Default)]
pub struct FakeDiscovery {
    schemas: Mutex<BTreeMap<String, BTreeMap<String, IndexMetadata>>>,
    unavailable: AtomicBool,
    schema_calls: AtomicUsize,
    table_calls: AtomicUsize,
    metadata_calls: AtomicUsize,
}

impl FakeDiscovery {
    /// Schema `s1` with index `idx1` mapping one integer field `a`.
    pub fn with_orders() -> Self {
        let discovery = Self::default();
        discovery.put_index("s1", "idx1", orders_metadata());
        discovery
    }

    pub fn put_index(&self, schema: &str, index: &str, metadata: IndexMetadata) {
        self.state()
            .entry(schema.to_string())
            .or_default()
            .insert(index.to_string(), metadata);
    }

    pub fn remove_index(&self, schema: &str, index: &str) {
        if let Some(indexes) = self.state().get_mut(schema) {
            indexes.remove(index);
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn schema_calls(&self) -> usize {
        self.schema_calls.load(Ordering::SeqCst)
    }

    pub fn table_calls(&self) -> usize {
        self.table_calls.load(Ordering::SeqCst)
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), DiscoveryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DiscoveryError::Unavailable {
                message: "remote store offline".into(),
            });
        }

        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, BTreeMap<String, BTreeMap<String, IndexMetadata>>> {
        self.schemas.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SchemaDiscovery for FakeDiscovery {
    fn list_schemas(&self) -> Result<Vec<String>, DiscoveryError> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self.state().keys().cloned().collect())
    }

    fn list_tables(&self, schema: &str) -> Result<Vec<String>, DiscoveryError> {
        self.table_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        self.state()
            .get(schema)
            .map(|indexes| indexes.keys().cloned().collect())
            .ok_or_else(|| DiscoveryError::SchemaNotFound {
                schema: schema.to_string(),
            })
    }

    fn index_metadata(&self, schema: &str, index: &str) -> Result<IndexMetadata, DiscoveryError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        self.state()
            .get(schema)
            .and_then(|indexes| indexes.get(index).cloned())
            .ok_or_else(|| DiscoveryError::IndexNotFound {
                schema: schema.to_string(),
                index: index.to_string(),
            })
    }
}

pub fn orders_metadata() -> IndexMetadata {
    IndexMetadata::new(vec![IndexField::new("a", IndexType::primitive("integer"))])
}

///
/// RecordingCache
///
/// Metadata cache that counts flushes and can be told to fail them.
///

#[derive(Default)]
pub struct RecordingCache {
    flushes: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingCache {
    pub fn failing() -> Self {
        let cache = Self::default();
        cache.failing.store(true, Ordering::SeqCst);
        cache
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl MetadataCache for RecordingCache {
    fn flush_cache(&self) -> Result<(), CacheError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::FlushFailed {
                cache: "recording".into(),
                message: "flush refused".into(),
            });
        }

        Ok(())
    }
}
