//! Module: schema
//! Responsibility: discovered index mappings and the columns derived from them.
//! Does not own: fetching mappings from the remote store (see `cache::SchemaDiscovery`).
//! Boundary: the only place remote mapping kinds are translated into engine types.

mod columns;


use crate::value::Float64;
use serde::{Deserialize, Serialize};

///
/// IndexType
///
/// Remote mapping type of one field.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexType {
    /// Named primitive kind such as `keyword`, `text` or `long`.
    Primitive { name: String },
    DateTime { formats: Vec<String> },
    ScaledFloat { scale: Float64 },
    IpAddress,
    Object { fields: Vec<IndexField> },
}

impl IndexType {
    #[must_use]
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive { name: name.into() }
    }

    #[must_use]
    pub const fn date_time(formats: Vec<String>) -> Self {
        Self::DateTime { formats }
    }

    #[must_use]
    pub const fn object(fields: Vec<IndexField>) -> Self {
        Self::Object { fields }
    }
}

///
/// IndexField
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexField {
    pub name: String,
    pub is_array: bool,
    #[serde(rename = "type")]
    pub index_type: IndexType,
}

impl IndexField {
    #[must_use]
    pub fn new(name: impl Into<String>, index_type: IndexType) -> Self {
        Self {
            name: name.into(),
            is_array: false,
            index_type,
        }
    }

    #[must_use]
    pub fn array(name: impl Into<String>, index_type: IndexType) -> Self {
        Self {
            is_array: true,
            ..Self::new(name, index_type)
        }
    }
}

///
/// IndexMetadata
///
/// Root mapping of one index as returned by schema discovery.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct IndexMetadata {
    pub fields: Vec<IndexField>,
}

impl IndexMetadata {
    #[must_use]
    pub const fn new(fields: Vec<IndexField>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&IndexField> {
        self.fields.iter().find(|field| field.name == name)
    }
}
