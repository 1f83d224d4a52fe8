use crate::schema::IndexType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Primitive kinds the remote store can filter on exactly.
const PUSHDOWN_PRIMITIVES: [&str; 8] = [
    "boolean", "byte", "short", "integer", "long", "float", "double", "keyword",
];

///
/// PredicateSupport
///
/// Recursive pushdown classification mirroring the shape of a mapping.
/// A node may carry children whatever its own flag says: a structured field
/// is itself not filterable while some of its descendants are.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredicateSupport {
    supports_predicates: bool,
    children: BTreeMap<String, Self>,
}

impl PredicateSupport {
    #[must_use]
    pub const fn new(supports_predicates: bool, children: BTreeMap<String, Self>) -> Self {
        Self {
            supports_predicates,
            children,
        }
    }

    /// Leaf classification for columns whose support is known up front
    /// (builtin or computed columns).
    #[must_use]
    pub const fn from_bool(supports_predicates: bool) -> Self {
        Self::new(supports_predicates, BTreeMap::new())
    }

    /// Classify one mapping node and, for objects, every descendant.
    #[must_use]
    pub fn classify(index_type: &IndexType) -> Self {
        let children = match index_type {
            IndexType::Object { fields } => fields
                .iter()
                .map(|field| (field.name.clone(), Self::classify(&field.index_type)))
                .collect(),
            _ => BTreeMap::new(),
        };

        Self::new(leaf_supports_predicates(index_type), children)
    }

    #[must_use]
    pub const fn supports_predicates(&self) -> bool {
        self.supports_predicates
    }

    #[must_use]
    pub const fn children(&self) -> &BTreeMap<String, Self> {
        &self.children
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.get(name)
    }

    /// Classification reached by descending `path`; the empty path is `self`.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<&Self> {
        path.iter()
            .try_fold(self, |node, segment| node.child(segment.as_ref()))
    }

    /// Whether the node at `path` accepts predicates; unknown paths do not.
    #[must_use]
    pub fn supports_path<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.resolve(path).is_some_and(Self::supports_predicates)
    }
}

fn leaf_supports_predicates(index_type: &IndexType) -> bool {
    match index_type {
        IndexType::DateTime { .. } => true,
        IndexType::Primitive { name } => PUSHDOWN_PRIMITIVES
            .iter()
            .any(|kind| name.eq_ignore_ascii_case(kind)),
        IndexType::ScaledFloat { .. } | IndexType::IpAddress | IndexType::Object { .. } => false,
    }
}
