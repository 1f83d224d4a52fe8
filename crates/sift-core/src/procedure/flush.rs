use crate::{cache::MetadataCache, procedure::Procedure};
use std::sync::Arc;
use tracing::{info, warn};

pub const SYSTEM_SCHEMA: &str = "system";
pub const FLUSH_METADATA_CACHE: &str = "flush_metadata_cache";

///
/// MetadataCacheCoordinator
///
/// Invalidates the schema discovery cache and, when configured, the
/// identifier mapping cache. Handles already given to the planner keep
/// their values; only later lookups see fresh metadata.
///

pub struct MetadataCacheCoordinator {
    metadata_cache: Arc<dyn MetadataCache>,
    identifier_mapping: Option<Arc<dyn MetadataCache>>,
}

impl MetadataCacheCoordinator {
    #[must_use]
    pub fn new(
        metadata_cache: Arc<dyn MetadataCache>,
        identifier_mapping: Option<Arc<dyn MetadataCache>>,
    ) -> Self {
        Self {
            metadata_cache,
            identifier_mapping,
        }
    }

    #[must_use]
    pub const fn has_identifier_mapping(&self) -> bool {
        self.identifier_mapping.is_some()
    }

    /// Flush both caches. A failure of one is logged and never stops the
    /// other; nothing is reported to the caller.
    pub fn flush_metadata_cache(&self) {
        info!(
            identifier_mapping = self.identifier_mapping.is_some(),
            "flushing metadata cache"
        );

        if let Err(err) = self.metadata_cache.flush_cache() {
            warn!(error = %err, "schema discovery cache flush failed");
        }

        if let Some(mapping) = &self.identifier_mapping
            && let Err(err) = mapping.flush_cache()
        {
            warn!(error = %err, "identifier mapping cache flush failed");
        }
    }

    /// The `system.flush_metadata_cache()` procedure bound to this coordinator.
    #[must_use]
    pub fn procedure(self: &Arc<Self>) -> Procedure {
        let coordinator = Arc::clone(self);

        Procedure::builtin(SYSTEM_SCHEMA, FLUSH_METADATA_CACHE, move |_| {
            coordinator.flush_metadata_cache();
            Ok(())
        })
    }
}
