use crate::domain::Domain;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::BTreeMap, fmt};

///
/// TupleDomain
///
/// Conjunction of per-column domains. An empty map means every row matches;
/// `None` means no row matches.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TupleDomain<C: Ord> {
    None,
    /// Holds neither all-domains nor none-domains. Build through `all` or
    /// `with_column_domains`; a hand-built map is not normalized.
    Domains(BTreeMap<C, Domain>),
}

impl<C: Ord> TupleDomain<C> {
    #[must_use]
    pub const fn all() -> Self {
        Self::Domains(BTreeMap::new())
    }

    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Build a normalized tuple domain from column domains.
    #[must_use]
    pub fn with_column_domains(domains: BTreeMap<C, Domain>) -> Self {
        if domains.values().any(Domain::is_none) {
            return Self::None;
        }

        Self::Domains(
            domains
                .into_iter()
                .filter(|(_, domain)| !domain.is_all())
                .collect(),
        )
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::Domains(domains) if domains.is_empty())
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Column domains, `None` when the tuple domain matches nothing.
    #[must_use]
    pub const fn domains(&self) -> Option<&BTreeMap<C, Domain>> {
        match self {
            Self::None => None,
            Self::Domains(domains) => Some(domains),
        }
    }

    #[must_use]
    pub fn domain(&self, column: &C) -> Option<&Domain> {
        self.domains().and_then(|domains| domains.get(column))
    }

    /// Split into the columns accepted by `keep` and the rest. Splitting a
    /// none-domain yields none on both sides.
    #[must_use]
    pub fn partition(self, mut keep: impl FnMut(&C) -> bool) -> (Self, Self) {
        match self {
            Self::None => (Self::None, Self::None),
            Self::Domains(domains) => {
                let (kept, rest) = domains.into_iter().partition(|(column, _)| keep(column));
                (Self::Domains(kept), Self::Domains(rest))
            }
        }
    }
}

impl<C: Clone + Ord> TupleDomain<C> {
    /// Logical AND of two tuple domains.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let (Self::Domains(left), Self::Domains(right)) = (self, other) else {
            return Self::None;
        };

        let mut merged = left.clone();
        for (column, domain) in right {
            let combined = match merged.get(column) {
                Some(existing) => existing.intersect(domain),
                None => domain.clone(),
            };
            merged.insert(column.clone(), combined);
        }

        Self::with_column_domains(merged)
    }
}

impl<C: Ord> Default for TupleDomain<C> {
    fn default() -> Self {
        Self::all()
    }
}

impl<C: Ord + fmt::Display> fmt::Display for TupleDomain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("NONE"),
            Self::Domains(domains) if domains.is_empty() => f.write_str("ALL"),
            Self::Domains(domains) => {
                for (i, (column, domain)) in domains.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    write!(f, "{column} IN {domain}")?;
                }
                Ok(())
            }
        }
    }
}

//
// Serialization
//
// Column keys are structured values, so the map travels as a list of
// `{column, domain}` entries; `columnDomains: null` encodes `None`.
//

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TupleDomainRef<'a, C> {
    column_domains: Option<Vec<ColumnDomainRef<'a, C>>>,
}

#[derive(Serialize)]
struct ColumnDomainRef<'a, C> {
    column: &'a C,
    domain: &'a Domain,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TupleDomainParts<C> {
    column_domains: Option<Vec<ColumnDomainParts<C>>>,
}

#[derive(Deserialize)]
struct ColumnDomainParts<C> {
    column: C,
    domain: Domain,
}

impl<C: Ord + Serialize> Serialize for TupleDomain<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let column_domains = self.domains().map(|domains| {
            domains
                .iter()
                .map(|(column, domain)| ColumnDomainRef { column, domain })
                .collect()
        });

        TupleDomainRef { column_domains }.serialize(serializer)
    }
}

impl<'de, C: Ord + Deserialize<'de>> Deserialize<'de> for TupleDomain<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = TupleDomainParts::<C>::deserialize(deserializer)?;

        let Some(entries) = parts.column_domains else {
            return Ok(Self::None);
        };

        // a column listed twice keeps the AND of its entries
        let mut domains = BTreeMap::new();
        for ColumnDomainParts { column, domain } in entries {
            let combined = match domains.remove(&column) {
                Some(existing) => domain.intersect(&existing),
                None => domain,
            };
            domains.insert(column, combined);
        }

        Ok(Self::with_column_domains(domains))
    }
}
