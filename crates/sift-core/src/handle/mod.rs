//! Module: handle
//! Responsibility: immutable column and table handles threaded through planning.
//! Does not own: schema discovery or the remote request built from a final handle.
//! Boundary: the planner only ever sees these values; they are also cache and
//! plan-fingerprint keys, so equality is structural over every attribute.

mod column;
mod fingerprint;
mod pushdown;
mod table;


pub use column::ColumnHandle;
pub use fingerprint::HandleFingerprint;
pub use pushdown::FilterApplication;
pub use table::{TableHandle, TableKind};

use thiserror::Error as ThisError;

///
/// HandleError
///

#[derive(Debug, ThisError)]
pub enum HandleError {
    #[error("required attribute '{attribute}' is missing")]
    MissingAttribute { attribute: &'static str },

    #[error("dereference path of column '{column}' has an empty segment at {position}")]
    EmptyPathSegment { column: String, position: usize },

    #[error("column '{column}' has no field '{field}'")]
    UnknownField { column: String, field: String },

    #[error("query table '{index}' requires a native query")]
    MissingNativeQuery { index: String },

    #[error("column '{column}' already filtered by regex '{existing}', cannot also apply '{pattern}'")]
    ConflictingRegex {
        column: String,
        existing: String,
        pattern: String,
    },

    #[error("column '{column}' is not reachable from index '{index}'")]
    UnreachableColumn { column: String, index: String },
}
