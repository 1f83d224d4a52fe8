use crate::{
    decoder::DecoderDescriptor, handle::HandleError, predicate::PredicateSupport,
    types::ColumnType,
};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ColumnHandle
///
/// Immutable identifier of one top-level column or one dereferenced
/// sub-field of a row column. Equality, hashing and ordering are structural
/// over name, type, decoder, predicate support and dereference path; the
/// qualified name is derived from name and path at construction.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase", try_from = "ColumnHandleParts")]
pub struct ColumnHandle {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
    decoder: DecoderDescriptor,
    predicate_support: PredicateSupport,
    dereference_path: Vec<String>,
    #[serde(skip_serializing)]
    qualified_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnHandleParts {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
    decoder: DecoderDescriptor,
    predicate_support: PredicateSupport,
    dereference_path: Vec<String>,
}

impl TryFrom<ColumnHandleParts> for ColumnHandle {
    type Error = HandleError;

    fn try_from(parts: ColumnHandleParts) -> Result<Self, Self::Error> {
        Self::try_new(
            parts.name,
            parts.column_type,
            parts.decoder,
            parts.predicate_support,
            parts.dereference_path,
        )
    }
}

impl ColumnHandle {
    /// Validate and construct a column handle.
    pub fn try_new(
        name: impl Into<String>,
        column_type: ColumnType,
        decoder: DecoderDescriptor,
        predicate_support: PredicateSupport,
        dereference_path: Vec<String>,
    ) -> Result<Self, HandleError> {
        let name = name.into();
        if name.is_empty() {
            return Err(HandleError::MissingAttribute { attribute: "name" });
        }
        if let Some(position) = dereference_path.iter().position(String::is_empty) {
            return Err(HandleError::EmptyPathSegment { column: name, position });
        }

        let qualified_name = qualify(&name, &dereference_path);

        Ok(Self {
            name,
            column_type,
            decoder,
            predicate_support,
            dereference_path,
            qualified_name,
        })
    }

    /// Handle of the nested field `field` inside this row column.
    pub fn dereference(&self, field: &str) -> Result<Self, HandleError> {
        let unknown = || HandleError::UnknownField {
            column: self.qualified_name.clone(),
            field: field.to_string(),
        };

        let column_type = self.column_type.field(field).ok_or_else(unknown)?;
        let decoder = self.decoder.field(field).ok_or_else(unknown)?;
        let predicate_support = self
            .predicate_support
            .child(field)
            .cloned()
            .unwrap_or_else(|| PredicateSupport::from_bool(false));

        let mut dereference_path = self.dereference_path.clone();
        dereference_path.push(field.to_string());

        Self::try_new(
            self.name.clone(),
            column_type.clone(),
            decoder.clone(),
            predicate_support,
            dereference_path,
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    #[must_use]
    pub const fn decoder(&self) -> &DecoderDescriptor {
        &self.decoder
    }

    #[must_use]
    pub const fn predicate_support(&self) -> &PredicateSupport {
        &self.predicate_support
    }

    #[must_use]
    pub fn dereference_path(&self) -> &[String] {
        &self.dereference_path
    }

    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    #[must_use]
    pub fn is_dereference(&self) -> bool {
        !self.dereference_path.is_empty()
    }

    /// Whether the engine may offer constraints on this column.
    #[must_use]
    pub const fn supports_predicates(&self) -> bool {
        self.predicate_support.supports_predicates()
    }
}

impl fmt::Display for ColumnHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.qualified_name, self.column_type)
    }
}

fn qualify(name: &str, dereference_path: &[String]) -> String {
    if dereference_path.is_empty() {
        return name.to_string();
    }

    format!("{name}.{}", dereference_path.join("."))
}
