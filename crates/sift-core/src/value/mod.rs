//! Module: value
//! Responsibility: scalar literals used in tuple-domain constraints.
//! Does not own: column typing or decoding of remote documents.

mod float;

pub use float::{Float64, Float64Error};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// LiteralKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum LiteralKind {
    #[display("boolean")]
    Boolean,
    #[display("integer")]
    Integer,
    #[display("double")]
    Double,
    #[display("varchar")]
    Varchar,
    #[display("timestamp")]
    Timestamp,
}

///
/// Literal
///
/// One comparable scalar. Ordering is only meaningful between literals of
/// the same kind; domain construction rejects mixed kinds.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    Double(Float64),
    Varchar(String),
    /// Milliseconds since the Unix epoch, UTC.
    Timestamp(i64),
}

impl Literal {
    #[must_use]
    pub const fn kind(&self) -> LiteralKind {
        match self {
            Self::Boolean(_) => LiteralKind::Boolean,
            Self::Integer(_) => LiteralKind::Integer,
            Self::Double(_) => LiteralKind::Double,
            Self::Varchar(_) => LiteralKind::Varchar,
            Self::Timestamp(_) => LiteralKind::Timestamp,
        }
    }

    /// Stable one-byte tag for the handle fingerprint stream.
    pub(crate) const fn tag(&self) -> u8 {
        match self {
            Self::Boolean(_) => 0x41,
            Self::Integer(_) => 0x42,
            Self::Double(_) => 0x43,
            Self::Varchar(_) => 0x44,
            Self::Timestamp(_) => 0x45,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Integer(v) | Self::Timestamp(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Varchar(v) => write!(f, "'{v}'"),
        }
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<Float64> for Literal {
    fn from(v: Float64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Self::Varchar(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Self::Varchar(v)
    }
}
