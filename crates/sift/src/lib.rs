//! ## Crate layout
//! - `core`: handles, tuple domains, metadata caches and procedures.
//! - `config`: TOML connector configuration.
//! - `connector`: builds the caches, the flush coordinator and the procedure
//!   registry from a configuration and a schema discovery.
//!
//! The `prelude` module mirrors the planning surface.

pub use sift_config as config;
pub use sift_core as core;

pub mod connector;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use connector::{Connector, ConnectorError};
pub use sift_core::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        config::ConnectorConfig,
        connector::Connector,
        core::{cache::SchemaDiscovery, prelude::*},
    };
}
