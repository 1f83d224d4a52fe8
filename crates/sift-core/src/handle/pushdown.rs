//! Planner entry points: each returns `None` when nothing new is pushed,
//! so the engine can stop iterating.

use crate::{
    domain::TupleDomain,
    handle::{ColumnHandle, TableHandle},
};
use std::collections::BTreeSet;
use tracing::trace;

///
/// FilterApplication
///
/// Result of offering a constraint: the refined handle plus the part of the
/// offer the engine must still evaluate itself.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterApplication {
    pub handle: TableHandle,
    pub remaining: TupleDomain<ColumnHandle>,
}

impl TableHandle {
    /// Accept the domains of columns that support predicates.
    #[must_use]
    pub fn apply_filter(&self, offered: &TupleDomain<ColumnHandle>) -> Option<FilterApplication> {
        let (pushed, remaining) = offered
            .clone()
            .partition(ColumnHandle::supports_predicates);

        let constraint = self.constraint().intersect(&pushed);
        if constraint == *self.constraint() {
            trace!(index = self.index(), "filter offer adds nothing");
            return None;
        }

        Some(FilterApplication {
            handle: self.with_constraint(&pushed),
            remaining,
        })
    }

    #[must_use]
    pub fn apply_limit(&self, limit: u64) -> Option<Self> {
        if self.limit().is_some_and(|current| current <= limit) {
            return None;
        }

        Some(self.with_limit(limit))
    }

    #[must_use]
    pub fn apply_projection(&self, columns: BTreeSet<ColumnHandle>) -> Option<Self> {
        if *self.projected_columns() == columns {
            return None;
        }

        Some(self.with_projected_columns(columns))
    }
}
