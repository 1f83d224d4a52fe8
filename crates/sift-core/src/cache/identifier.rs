use crate::cache::{CacheError, CacheStats, DiscoveryError, MetadataCache, SchemaDiscovery, TtlCache};
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tracing::{debug, warn};

// lowercased name -> remote names folding to it
type NameIndex = BTreeMap<String, Vec<String>>;

///
/// CachingIdentifierMapping
///
/// Resolves engine identifiers, which arrive case-folded, to the remote
/// store's case-sensitive schema and index names. Listings come straight
/// from the raw discovery, never from the metadata cache, so each cache
/// can be flushed on its own.
///

pub struct CachingIdentifierMapping {
    discovery: Arc<dyn SchemaDiscovery>,
    schemas: TtlCache<(), NameIndex>,
    tables: TtlCache<String, NameIndex>,
}

impl CachingIdentifierMapping {
    #[must_use]
    pub fn new(discovery: Arc<dyn SchemaDiscovery>, ttl: Duration) -> Self {
        Self {
            discovery,
            schemas: TtlCache::new("remote_schema_names", ttl),
            tables: TtlCache::new("remote_table_names", ttl),
        }
    }

    /// Remote name of schema `name`; unknown names are returned unchanged.
    pub fn remote_schema(&self, name: &str) -> Result<String, DiscoveryError> {
        let names = self
            .schemas
            .get_or_try_load(&(), || self.discovery.list_schemas().map(index_names))?;

        resolve(&names, name)
    }

    /// Remote name of index `name` inside the remote schema `remote_schema`.
    pub fn remote_table(&self, remote_schema: &str, name: &str) -> Result<String, DiscoveryError> {
        let names = self
            .tables
            .get_or_try_load(&remote_schema.to_string(), || {
                self.discovery.list_tables(remote_schema).map(index_names)
            })?;

        resolve(&names, name)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.schemas.stats() + self.tables.stats()
    }
}

impl MetadataCache for CachingIdentifierMapping {
    fn flush_cache(&self) -> Result<(), CacheError> {
        self.schemas.invalidate_all();
        self.tables.invalidate_all();
        debug!("identifier mapping cache flushed");

        Ok(())
    }
}

fn index_names(remote: Vec<String>) -> NameIndex {
    let mut names = NameIndex::new();
    for name in remote {
        names.entry(name.to_lowercase()).or_default().push(name);
    }

    names
}

fn resolve(names: &NameIndex, name: &str) -> Result<String, DiscoveryError> {
    match names.get(&name.to_lowercase()).map(Vec::as_slice) {
        None => Ok(name.to_string()),
        Some([single]) => Ok(single.clone()),
        Some(candidates) => {
            warn!(name, candidates = candidates.len(), "ambiguous remote name");
            Err(DiscoveryError::AmbiguousName {
                name: name.to_string(),
                candidates: candidates.to_vec(),
            })
        }
    }
}
