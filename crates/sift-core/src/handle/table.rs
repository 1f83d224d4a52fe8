use crate::{
    domain::TupleDomain,
    handle::{ColumnHandle, HandleError},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

///
/// TableKind
///
/// Fixed at creation; refinements never change it.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TableKind {
    /// Plain scan of an index.
    #[display("SCAN")]
    Scan,
    /// Result of a connector-native free-text query.
    #[display("QUERY")]
    Query,
}

///
/// TableHandle
///
/// One index plus everything pushed down into it so far. Every refinement
/// returns a new value and leaves the receiver untouched; equality and
/// hashing cover all eight attributes.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", try_from = "TableHandleParts")]
pub struct TableHandle {
    #[serde(rename = "type")]
    kind: TableKind,
    schema: String,
    index: String,
    constraint: TupleDomain<ColumnHandle>,
    regexes: BTreeMap<String, String>,
    query: Option<String>,
    limit: Option<u64>,
    projected_columns: BTreeSet<ColumnHandle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableHandleParts {
    #[serde(rename = "type")]
    kind: TableKind,
    schema: String,
    index: String,
    constraint: TupleDomain<ColumnHandle>,
    regexes: BTreeMap<String, String>,
    query: Option<String>,
    limit: Option<u64>,
    projected_columns: BTreeSet<ColumnHandle>,
}

impl TryFrom<TableHandleParts> for TableHandle {
    type Error = HandleError;

    fn try_from(parts: TableHandleParts) -> Result<Self, Self::Error> {
        let handle = Self::try_new(parts.kind, parts.schema, parts.index, parts.query)?;

        Ok(Self {
            constraint: parts.constraint,
            regexes: parts.regexes,
            limit: parts.limit,
            projected_columns: parts.projected_columns,
            ..handle
        })
    }
}

impl TableHandle {
    /// Construct the initial handle of a table reference: no constraint,
    /// regexes, limit or projection.
    pub fn try_new(
        kind: TableKind,
        schema: impl Into<String>,
        index: impl Into<String>,
        query: Option<String>,
    ) -> Result<Self, HandleError> {
        let schema = schema.into();
        let index = index.into();

        if schema.is_empty() {
            return Err(HandleError::MissingAttribute { attribute: "schema" });
        }
        if index.is_empty() {
            return Err(HandleError::MissingAttribute { attribute: "index" });
        }
        if kind == TableKind::Query && query.as_deref().is_none_or(str::is_empty) {
            return Err(HandleError::MissingNativeQuery { index });
        }

        Ok(Self {
            kind,
            schema,
            index,
            constraint: TupleDomain::all(),
            regexes: BTreeMap::new(),
            query,
            limit: None,
            projected_columns: BTreeSet::new(),
        })
    }

    /// Plain SCAN handle.
    pub fn scan(schema: impl Into<String>, index: impl Into<String>) -> Result<Self, HandleError> {
        Self::try_new(TableKind::Scan, schema, index, None)
    }

    /// Replace the projected columns. Not validated against the schema; an
    /// empty set means no projection has been decided, not "no columns".
    #[must_use]
    pub fn with_projected_columns(&self, projected_columns: BTreeSet<ColumnHandle>) -> Self {
        Self {
            projected_columns,
            ..self.clone()
        }
    }

    /// Conjoin `constraint` with the accepted constraint.
    #[must_use]
    pub fn with_constraint(&self, constraint: &TupleDomain<ColumnHandle>) -> Self {
        Self {
            constraint: self.constraint.intersect(constraint),
            ..self.clone()
        }
    }

    /// Add regex filters. A column already filtered with a different pattern
    /// is rejected since one remote regex per column cannot express both.
    pub fn with_regexes(&self, regexes: BTreeMap<String, String>) -> Result<Self, HandleError> {
        let mut merged = self.regexes.clone();
        for (column, pattern) in regexes {
            match merged.get(&column) {
                Some(existing) if *existing != pattern => {
                    return Err(HandleError::ConflictingRegex {
                        column,
                        existing: existing.clone(),
                        pattern,
                    });
                }
                Some(_) => {}
                None => {
                    merged.insert(column, pattern);
                }
            }
        }

        Ok(Self {
            regexes: merged,
            ..self.clone()
        })
    }

    /// Keep the tighter of the current and the given limit.
    #[must_use]
    pub fn with_limit(&self, limit: u64) -> Self {
        let limit = self.limit.map_or(limit, |current| current.min(limit));

        Self {
            limit: Some(limit),
            ..self.clone()
        }
    }

    /// Narrow the native query; an existing query is conjoined, not replaced.
    #[must_use]
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        let query = query.into();
        let query = match &self.query {
            Some(current) if *current == query => current.clone(),
            Some(current) => format!("({current}) AND ({query})"),
            None => query,
        };

        Self {
            query: Some(query),
            ..self.clone()
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TableKind {
        self.kind
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }

    #[must_use]
    pub const fn constraint(&self) -> &TupleDomain<ColumnHandle> {
        &self.constraint
    }

    #[must_use]
    pub const fn regexes(&self) -> &BTreeMap<String, String> {
        &self.regexes
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    #[must_use]
    pub const fn projected_columns(&self) -> &BTreeSet<ColumnHandle> {
        &self.projected_columns
    }
}

impl fmt::Display for TableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.index)?;

        let mut attributes = String::new();
        if !self.regexes.is_empty() {
            let pairs: Vec<String> = self
                .regexes
                .iter()
                .map(|(column, pattern)| format!("{column}:{pattern}"))
                .collect();
            attributes.push_str("regexes=[");
            attributes.push_str(&pairs.join(", "));
            attributes.push(']');
        }
        if let Some(limit) = self.limit {
            attributes.push_str(&format!("limit={limit}"));
        }
        // no separator before the query text: existing plan dumps rely on it
        if let Some(query) = &self.query {
            attributes.push_str("query");
            attributes.push_str(query);
        }

        if !attributes.is_empty() {
            write!(f, "({attributes})")?;
        }

        Ok(())
    }
}
