//! Decoder descriptors: how a typed value is extracted from a remote document.

use serde::{Deserialize, Serialize};

/// Remote field holding the document id.
pub const ID_FIELD: &str = "_id";
/// Remote field holding the relevance score.
pub const SCORE_FIELD: &str = "_score";
/// Remote field holding the raw document source.
pub const SOURCE_FIELD: &str = "_source";

///
/// DecoderDescriptor
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(tag = "@type", rename_all = "snake_case")]
pub enum DecoderDescriptor {
    Boolean { path: String },
    TinyInt { path: String },
    SmallInt { path: String },
    Integer { path: String },
    BigInt { path: String },
    Real { path: String },
    Double { path: String },
    Varchar { path: String },
    Varbinary { path: String },
    Timestamp { path: String },
    IpAddress { path: String },
    Array { path: String, element: Box<Self> },
    Row { path: String, fields: Vec<RowDecoderField> },
    Id,
    Score,
    Source,
}

impl DecoderDescriptor {
    /// Dotted path of the remote field this decoder reads.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Boolean { path }
            | Self::TinyInt { path }
            | Self::SmallInt { path }
            | Self::Integer { path }
            | Self::BigInt { path }
            | Self::Real { path }
            | Self::Double { path }
            | Self::Varchar { path }
            | Self::Varbinary { path }
            | Self::Timestamp { path }
            | Self::IpAddress { path }
            | Self::Array { path, .. }
            | Self::Row { path, .. } => path,
            Self::Id => ID_FIELD,
            Self::Score => SCORE_FIELD,
            Self::Source => SOURCE_FIELD,
        }
    }

    /// Decoder of a named row field, `None` for non-row decoders.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Row { fields, .. } => fields
                .iter()
                .find(|field| field.name == name)
                .map(|field| &field.decoder),
            _ => None,
        }
    }
}

///
/// RowDecoderField
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct RowDecoderField {
    pub name: String,
    pub decoder: DecoderDescriptor,
}

impl RowDecoderField {
    #[must_use]
    pub fn new(name: impl Into<String>, decoder: DecoderDescriptor) -> Self {
        Self {
            name: name.into(),
            decoder,
        }
    }
}
