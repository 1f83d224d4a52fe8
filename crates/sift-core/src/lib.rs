//! Core of the Sift search-index connector: pushdown-aware column and table
//! handles, tuple-domain constraints, metadata caches and the administrative
//! flush procedure.

pub mod cache;
pub mod decoder;
pub mod domain;
pub mod error;
pub mod handle;
pub mod predicate;
pub mod procedure;
pub mod schema;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Planning vocabulary only. Caches, procedures and errors are imported
/// from their modules.
///

pub mod prelude {
    pub use crate::{
        domain::{Domain, Range, TupleDomain, ValueSet},
        handle::{ColumnHandle, TableHandle, TableKind},
        predicate::PredicateSupport,
        schema::IndexMetadata,
        types::ColumnType,
        value::Literal,
    };
}
