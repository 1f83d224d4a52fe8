//! Module: connector
//! Responsibility: wiring of caches, coordinator and procedures from config.
//! Does not own: any planning rule; those live on the handles themselves.
//! Boundary: the engine reaches metadata only through `Connector`.

use crate::{
    config::{ConfigError, ConnectorConfig},
    core::{
        Error,
        cache::{CachingIdentifierMapping, CachingSchemaDiscovery, MetadataCache, SchemaDiscovery},
        handle::{ColumnHandle, HandleError, TableHandle},
        procedure::{MetadataCacheCoordinator, ProcedureRegistry},
        schema::IndexMetadata,
    },
};
use std::{fmt, path::Path, sync::Arc};
use thiserror::Error as ThisError;
use tracing::debug;

type Discovery = Arc<dyn SchemaDiscovery>;

///
/// ConnectorError
///

#[derive(Debug, ThisError)]
pub enum ConnectorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}", .0.display_with_class())]
    Core(#[from] Error),
}

///
/// Connector
///
/// One configured catalog. Lookups go through the metadata cache; names are
/// mapped to remote spellings first when case-insensitive matching is on.
///

pub struct Connector {
    discovery: Arc<CachingSchemaDiscovery<Discovery>>,
    identifier_mapping: Option<Arc<CachingIdentifierMapping>>,
    coordinator: Arc<MetadataCacheCoordinator>,
    procedures: ProcedureRegistry,
}

impl Connector {
    pub fn new(config: &ConnectorConfig, discovery: Discovery) -> Result<Self, ConnectorError> {
        let identifier_mapping = config
            .identifiers
            .case_insensitive_name_matching
            .then(|| {
                Arc::new(CachingIdentifierMapping::new(
                    Arc::clone(&discovery),
                    config.identifiers.cache_ttl(),
                ))
            });
        let cached = Arc::new(CachingSchemaDiscovery::new(
            discovery,
            config.metadata.cache_ttl(),
            config.metadata.cache_missing,
        ));

        let coordinator = Arc::new(MetadataCacheCoordinator::new(
            Arc::clone(&cached) as Arc<dyn MetadataCache>,
            identifier_mapping
                .as_ref()
                .map(|mapping| Arc::clone(mapping) as Arc<dyn MetadataCache>),
        ));

        let mut procedures = ProcedureRegistry::new();
        procedures
            .register(coordinator.procedure())
            .map_err(Error::from)?;

        debug!(
            metadata_ttl_secs = config.metadata.cache_ttl_secs,
            identifier_mapping = identifier_mapping.is_some(),
            "connector initialised"
        );

        Ok(Self {
            discovery: cached,
            identifier_mapping,
            coordinator,
            procedures,
        })
    }

    pub fn from_config_path(
        path: impl AsRef<Path>,
        discovery: Discovery,
    ) -> Result<Self, ConnectorError> {
        let config = ConnectorConfig::from_path(path)?;

        Self::new(&config, discovery)
    }

    #[must_use]
    pub fn discovery(&self) -> &CachingSchemaDiscovery<Discovery> {
        &self.discovery
    }

    #[must_use]
    pub fn identifier_mapping(&self) -> Option<&CachingIdentifierMapping> {
        self.identifier_mapping.as_deref()
    }

    #[must_use]
    pub const fn coordinator(&self) -> &Arc<MetadataCacheCoordinator> {
        &self.coordinator
    }

    #[must_use]
    pub const fn procedures(&self) -> &ProcedureRegistry {
        &self.procedures
    }

    /// Initial SCAN handle of `schema.table`, after checking the index exists.
    pub fn table_handle(&self, schema: &str, table: &str) -> Result<TableHandle, Error> {
        let (schema, index) = self.remote_names(schema, table)?;
        self.discovery.shared_index_metadata(&schema, &index)?;

        Ok(TableHandle::scan(schema, index)?)
    }

    pub fn index_metadata(&self, handle: &TableHandle) -> Result<Arc<IndexMetadata>, Error> {
        Ok(self
            .discovery
            .shared_index_metadata(handle.schema(), handle.index())?)
    }

    /// Every column of the handle's index, builtin columns first.
    pub fn columns(&self, handle: &TableHandle) -> Result<Vec<ColumnHandle>, Error> {
        Ok(self.index_metadata(handle)?.columns()?)
    }

    /// Top-level column `name` of the handle's index.
    pub fn column(&self, handle: &TableHandle, name: &str) -> Result<ColumnHandle, Error> {
        self.index_metadata(handle)?
            .column(name)?
            .ok_or_else(|| {
                HandleError::UnknownField {
                    column: handle.index().to_string(),
                    field: name.to_string(),
                }
                .into()
            })
    }

    /// Check the handle's projection against the current mapping.
    pub fn validate_projection(&self, handle: &TableHandle) -> Result<(), Error> {
        self.index_metadata(handle)?
            .validate_projection(handle.index(), handle.projected_columns())?;

        Ok(())
    }

    fn remote_names(&self, schema: &str, table: &str) -> Result<(String, String), Error> {
        let Some(mapping) = &self.identifier_mapping else {
            return Ok((schema.to_string(), table.to_string()));
        };

        let schema = mapping.remote_schema(schema)?;
        let table = mapping.remote_table(&schema, table)?;

        Ok((schema, table))
    }
}

impl fmt::Debug for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("identifier_mapping", &self.identifier_mapping.is_some())
            .field("procedures", &self.procedures)
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///
