//! Module: domain
//! Responsibility: tuple-domain constraints over column handles.
//! Does not own: deciding which columns may be pushed down (see `handle`).
//!
//! Invariants:
//! - `ValueSet::Ranges` is sorted, disjoint, and never empty.
//! - A `TupleDomain` never stores an all-domain, and any none-domain
//!   collapses the whole tuple domain to `TupleDomain::None`.
//! - Intersection never widens either operand.

mod range;
mod tuple;


pub use range::{Marker, Range};
pub use tuple::TupleDomain;

use crate::value::{Literal, LiteralKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

///
/// DomainError
///

#[derive(Debug, ThisError)]
pub enum DomainError {
    #[error("range {range} contains no values")]
    EmptyRange { range: String },

    #[error("cannot mix {left} and {right} literals in one domain")]
    MixedLiteralKinds {
        left: LiteralKind,
        right: LiteralKind,
    },
}

///
/// ValueSet
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSet {
    All,
    None,
    /// Sorted, disjoint, non-empty ranges of one literal kind. Build through
    /// `of_ranges`; a hand-built vector is not normalized.
    Ranges(Vec<Range>),
}

impl ValueSet {
    /// Build a normalized value set from arbitrary ranges.
    pub fn of_ranges(ranges: Vec<Range>) -> Result<Self, DomainError> {
        check_single_kind(ranges.iter().flat_map(|r| [r.low().value(), r.high().value()]))?;

        Ok(Self::from_ranges_unchecked(ranges))
    }

    fn from_ranges_unchecked(ranges: Vec<Range>) -> Self {
        let ranges = range::normalize_ranges(ranges);

        match ranges.as_slice() {
            [] => Self::None,
            [only] if only.is_all() => Self::All,
            _ => Self::Ranges(ranges),
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub fn contains(&self, value: &Literal) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Ranges(ranges) => ranges.iter().any(|range| range.contains(value)),
        }
    }

    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::None, _) | (_, Self::None) => Self::None,
            (Self::All, set) | (set, Self::All) => set.clone(),
            (Self::Ranges(left), Self::Ranges(right)) => {
                let mut overlaps = Vec::new();
                for l in left {
                    overlaps.extend(right.iter().filter_map(|r| l.intersect(r)));
                }

                Self::from_ranges_unchecked(overlaps)
            }
        }
    }
}

impl fmt::Display for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::None => f.write_str("NONE"),
            Self::Ranges(ranges) => {
                f.write_str("{")?;
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{range}")?;
                }
                f.write_str("}")
            }
        }
    }
}

///
/// Domain
///
/// Allowed values of one column plus whether NULL passes.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase", try_from = "DomainParts")]
pub struct Domain {
    values: ValueSet,
    null_allowed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainParts {
    values: ValueSet,
    null_allowed: bool,
}

impl TryFrom<DomainParts> for Domain {
    type Error = DomainError;

    fn try_from(parts: DomainParts) -> Result<Self, Self::Error> {
        Self::new(parts.values, parts.null_allowed)
    }
}

impl Domain {
    /// Build a domain, re-normalizing any explicit ranges.
    pub fn new(values: ValueSet, null_allowed: bool) -> Result<Self, DomainError> {
        let values = match values {
            ValueSet::Ranges(ranges) => ValueSet::of_ranges(ranges)?,
            other => other,
        };

        Ok(Self::from_parts(values, null_allowed))
    }

    const fn from_parts(values: ValueSet, null_allowed: bool) -> Self {
        Self {
            values,
            null_allowed,
        }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self::from_parts(ValueSet::All, true)
    }

    #[must_use]
    pub const fn none() -> Self {
        Self::from_parts(ValueSet::None, false)
    }

    #[must_use]
    pub const fn only_null() -> Self {
        Self::from_parts(ValueSet::None, true)
    }

    #[must_use]
    pub const fn not_null() -> Self {
        Self::from_parts(ValueSet::All, false)
    }

    #[must_use]
    pub fn single_value(value: impl Into<Literal>) -> Self {
        Self::from_parts(ValueSet::Ranges(vec![Range::equal(value.into())]), false)
    }

    pub fn multiple_values<I>(values: I) -> Result<Self, DomainError>
    where
        I: IntoIterator,
        I::Item: Into<Literal>,
    {
        let ranges = values
            .into_iter()
            .map(|value| Range::equal(value.into()))
            .collect();

        Ok(Self::from_parts(ValueSet::of_ranges(ranges)?, false))
    }

    pub fn range(range: Range) -> Result<Self, DomainError> {
        Ok(Self::from_parts(ValueSet::of_ranges(vec![range])?, false))
    }

    #[must_use]
    pub const fn values(&self) -> &ValueSet {
        &self.values
    }

    #[must_use]
    pub const fn is_null_allowed(&self) -> bool {
        self.null_allowed
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        self.values.is_all() && self.null_allowed
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.values.is_none() && !self.null_allowed
    }

    /// `None` tests NULL membership.
    #[must_use]
    pub fn contains(&self, value: Option<&Literal>) -> bool {
        value.map_or(self.null_allowed, |value| self.values.contains(value))
    }

    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self::from_parts(
            self.values.intersect(&other.values),
            self.null_allowed && other.null_allowed,
        )
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values)?;
        if self.null_allowed {
            f.write_str(" OR NULL")?;
        }

        Ok(())
    }
}

fn check_single_kind<'a>(
    values: impl IntoIterator<Item = Option<&'a Literal>>,
) -> Result<(), DomainError> {
    let mut kinds = values.into_iter().flatten().map(Literal::kind);
    let Some(first) = kinds.next() else {
        return Ok(());
    };

    match kinds.find(|kind| *kind != first) {
        Some(other) => Err(DomainError::MixedLiteralKinds {
            left: first,
            right: other,
        }),
        None => Ok(()),
    }
}
