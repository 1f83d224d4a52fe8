use crate::{
    domain::DomainError,
    value::{Literal, LiteralKind},
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

///
/// Marker
///
/// One endpoint of a range. `Unbounded` means below every value when used
/// as a low endpoint and above every value when used as a high endpoint.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Unbounded,
    Inclusive(Literal),
    Exclusive(Literal),
}

impl Marker {
    #[must_use]
    pub const fn value(&self) -> Option<&Literal> {
        match self {
            Self::Unbounded => None,
            Self::Inclusive(value) | Self::Exclusive(value) => Some(value),
        }
    }

    const fn is_inclusive(&self) -> bool {
        matches!(self, Self::Inclusive(_))
    }
}

// Position of a low endpoint; ties start earlier when inclusive.
fn cmp_low(a: &Marker, b: &Marker) -> Ordering {
    match (a.value(), b.value()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x
            .cmp(y)
            .then_with(|| b.is_inclusive().cmp(&a.is_inclusive())),
    }
}

// Position of a high endpoint; ties end later when inclusive.
fn cmp_high(a: &Marker, b: &Marker) -> Ordering {
    match (a.value(), b.value()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x
            .cmp(y)
            .then_with(|| a.is_inclusive().cmp(&b.is_inclusive())),
    }
}

///
/// Range
///
/// Non-empty interval over literals of one kind.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "RangeParts")]
pub struct Range {
    low: Marker,
    high: Marker,
}

#[derive(Deserialize)]
struct RangeParts {
    low: Marker,
    high: Marker,
}

impl TryFrom<RangeParts> for Range {
    type Error = DomainError;

    fn try_from(parts: RangeParts) -> Result<Self, Self::Error> {
        Self::try_new(parts.low, parts.high)
    }
}

impl Range {
    /// Validate and construct a range.
    pub fn try_new(low: Marker, high: Marker) -> Result<Self, DomainError> {
        if let (Some(l), Some(h)) = (low.value(), high.value())
            && l.kind() != h.kind()
        {
            return Err(DomainError::MixedLiteralKinds {
                left: l.kind(),
                right: h.kind(),
            });
        }

        let range = Self { low, high };
        if range.is_empty() {
            return Err(DomainError::EmptyRange {
                range: range.to_string(),
            });
        }

        Ok(range)
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            low: Marker::Unbounded,
            high: Marker::Unbounded,
        }
    }

    #[must_use]
    pub fn equal(value: Literal) -> Self {
        Self {
            low: Marker::Inclusive(value.clone()),
            high: Marker::Inclusive(value),
        }
    }

    #[must_use]
    pub const fn greater_than(value: Literal) -> Self {
        Self {
            low: Marker::Exclusive(value),
            high: Marker::Unbounded,
        }
    }

    #[must_use]
    pub const fn greater_than_or_equal(value: Literal) -> Self {
        Self {
            low: Marker::Inclusive(value),
            high: Marker::Unbounded,
        }
    }

    #[must_use]
    pub const fn less_than(value: Literal) -> Self {
        Self {
            low: Marker::Unbounded,
            high: Marker::Exclusive(value),
        }
    }

    #[must_use]
    pub const fn less_than_or_equal(value: Literal) -> Self {
        Self {
            low: Marker::Unbounded,
            high: Marker::Inclusive(value),
        }
    }

    #[must_use]
    pub const fn low(&self) -> &Marker {
        &self.low
    }

    #[must_use]
    pub const fn high(&self) -> &Marker {
        &self.high
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(
            (&self.low, &self.high),
            (Marker::Unbounded, Marker::Unbounded)
        )
    }

    #[must_use]
    pub fn is_single_value(&self) -> bool {
        matches!(
            (&self.low, &self.high),
            (Marker::Inclusive(l), Marker::Inclusive(h)) if l == h
        )
    }

    #[must_use]
    pub fn contains(&self, value: &Literal) -> bool {
        let above_low = match &self.low {
            Marker::Unbounded => true,
            Marker::Inclusive(l) => value >= l,
            Marker::Exclusive(l) => value > l,
        };
        let below_high = match &self.high {
            Marker::Unbounded => true,
            Marker::Inclusive(h) => value <= h,
            Marker::Exclusive(h) => value < h,
        };

        above_low && below_high
    }

    /// Overlap of two ranges, `None` when they are disjoint. Ranges over
    /// different literal kinds never overlap.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        if let (Some(left), Some(right)) = (self.kind(), other.kind())
            && left != right
        {
            return None;
        }

        let low = if cmp_low(&self.low, &other.low).is_ge() {
            self.low.clone()
        } else {
            other.low.clone()
        };
        let high = if cmp_high(&self.high, &other.high).is_le() {
            self.high.clone()
        } else {
            other.high.clone()
        };

        let range = Self { low, high };
        (!range.is_empty()).then_some(range)
    }

    fn kind(&self) -> Option<LiteralKind> {
        self.low.value().or_else(|| self.high.value()).map(Literal::kind)
    }

    fn is_empty(&self) -> bool {
        let (Some(l), Some(h)) = (self.low.value(), self.high.value()) else {
            return false;
        };

        match l.cmp(h) {
            Ordering::Less => false,
            Ordering::Greater => true,
            Ordering::Equal => !(self.low.is_inclusive() && self.high.is_inclusive()),
        }
    }

    // True when `next` (which starts no earlier than self) overlaps or
    // touches self so the two can be merged into one range.
    fn touches(&self, next: &Self) -> bool {
        let (Some(h), Some(l)) = (self.high.value(), next.low.value()) else {
            return true;
        };

        match l.cmp(h) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.high.is_inclusive() || next.low.is_inclusive(),
        }
    }

    fn span(self, next: Self) -> Self {
        let high = if cmp_high(&self.high, &next.high).is_ge() {
            self.high
        } else {
            next.high
        };

        Self {
            low: self.low,
            high,
        }
    }
}

impl Ord for Range {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_low(&self.low, &other.low).then_with(|| cmp_high(&self.high, &other.high))
    }
}

impl PartialOrd for Range {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_value()
            && let Some(value) = self.low.value()
        {
            return write!(f, "[{value}]");
        }

        match &self.low {
            Marker::Unbounded => f.write_str("(<min>")?,
            Marker::Inclusive(v) => write!(f, "[{v}")?,
            Marker::Exclusive(v) => write!(f, "({v}")?,
        }
        f.write_str(", ")?;
        match &self.high {
            Marker::Unbounded => f.write_str("<max>)"),
            Marker::Inclusive(v) => write!(f, "{v}]"),
            Marker::Exclusive(v) => write!(f, "{v})"),
        }
    }
}

/// Sort and merge overlapping or adjacent ranges.
pub(super) fn normalize_ranges(mut ranges: Vec<Range>) -> Vec<Range> {
    ranges.sort();

    let mut out: Vec<Range> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match out.pop() {
            Some(prev) if prev.touches(&range) => out.push(prev.span(range)),
            Some(prev) => {
                out.push(prev);
                out.push(range);
            }
            None => out.push(range),
        }
    }

    out
}
