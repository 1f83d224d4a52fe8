//! Connector configuration read from TOML.
//!
//! Every key is optional; unknown keys are rejected so a misspelled option
//! never silently falls back to its default.

use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path, time::Duration};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid connector config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// ConnectorConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectorConfig {
    pub metadata: MetadataCacheConfig,
    pub identifiers: IdentifierConfig,
}

impl ConnectorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&source)
    }
}

///
/// MetadataCacheConfig
///
/// Schema discovery caching. A zero TTL disables the cache.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataCacheConfig {
    pub cache_ttl_secs: u64,
    /// Also cache "index not found" answers.
    pub cache_missing: bool,
}

impl MetadataCacheConfig {
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

///
/// IdentifierConfig
///
/// Case-insensitive mapping of engine identifiers to remote names.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentifierConfig {
    pub case_insensitive_name_matching: bool,
    pub cache_ttl_secs: u64,
}

impl IdentifierConfig {
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            case_insensitive_name_matching: false,
            cache_ttl_secs: Self::DEFAULT_CACHE_TTL_SECS,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ConnectorConfig::from_toml_str("").unwrap();

        assert_eq!(config, ConnectorConfig::default());
        assert_eq!(config.metadata.cache_ttl(), Duration::ZERO);
        assert!(!config.metadata.cache_missing);
        assert!(!config.identifiers.case_insensitive_name_matching);
        assert_eq!(config.identifiers.cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn full_config_parses() {
        let config = ConnectorConfig::from_toml_str(
            r"
            [metadata]
            cache_ttl_secs = 300
            cache_missing = true

            [identifiers]
            case_insensitive_name_matching = true
            cache_ttl_secs = 5
            ",
        )
        .unwrap();

        assert_eq!(config.metadata.cache_ttl(), Duration::from_secs(300));
        assert!(config.metadata.cache_missing);
        assert!(config.identifiers.case_insensitive_name_matching);
        assert_eq!(config.identifiers.cache_ttl_secs, 5);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = ConnectorConfig::from_toml_str(
            r"
            [identifiers]
            case_insensitive_name_matching = true
            ",
        )
        .unwrap();

        assert_eq!(config.identifiers.cache_ttl_secs, 60);
        assert_eq!(config.metadata, MetadataCacheConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ConnectorConfig::from_toml_str(
            r"
            [metadata]
            cache_tll_secs = 10
            ",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        assert!(ConnectorConfig::from_toml_str("[transport]\ntls = true").is_err());
    }

    #[test]
    fn wrong_types_are_rejected() {
        let err = ConnectorConfig::from_toml_str("[metadata]\ncache_ttl_secs = \"soon\"").unwrap_err();
        assert!(err.to_string().starts_with("invalid connector config"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConnectorConfig::from_path("/nonexistent/sift.toml").unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/sift.toml"));
    }

    #[test]
    fn config_file_is_read() {
        let path = std::env::temp_dir().join(format!("sift-config-{}.toml", std::process::id()));
        fs::write(&path, "[metadata]\ncache_ttl_secs = 30\n").unwrap();

        let config = ConnectorConfig::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.metadata.cache_ttl_secs, 30);
    }
}
