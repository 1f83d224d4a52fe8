//! Module: predicate
//! Responsibility: classify which (possibly nested) fields accept predicate pushdown.
//! Does not own: the constraint values themselves (see `domain`).
//!
//! Invariants:
//! - Object nodes never support predicates directly; only leaves can.
//! - Classification is a pure function of the mapping and never fails.

mod support;


pub use support::PredicateSupport;
