use crate::{
    decoder::{DecoderDescriptor, RowDecoderField},
    handle::{ColumnHandle, HandleError},
    predicate::PredicateSupport,
    schema::{IndexField, IndexMetadata, IndexType},
    types::{ColumnType, RowField},
};
use std::collections::BTreeSet;

/// Precision of timestamps decoded from date mappings (milliseconds).
const TIMESTAMP_PRECISION: u8 = 3;

impl IndexMetadata {
    /// Every top-level column: builtin columns first, then each mappable field.
    pub fn columns(&self) -> Result<Vec<ColumnHandle>, HandleError> {
        let mut columns = builtin_columns()?;
        for field in &self.fields {
            if let Some(column) = top_level_column(field)? {
                columns.push(column);
            }
        }

        Ok(columns)
    }

    /// Top-level column by name, including builtin columns.
    pub fn column(&self, name: &str) -> Result<Option<ColumnHandle>, HandleError> {
        Ok(self
            .columns()?
            .into_iter()
            .find(|column| column.name() == name))
    }

    /// Whether `handle` addresses a column or sub-field of this mapping.
    #[must_use]
    pub fn reaches(&self, handle: &ColumnHandle) -> bool {
        let Ok(Some(mut current)) = self.column(handle.name()) else {
            return false;
        };

        for segment in handle.dereference_path() {
            match current.dereference(segment) {
                Ok(next) => current = next,
                Err(_) => return false,
            }
        }

        current == *handle
    }

    /// Check that every projected column is reachable from this mapping.
    pub fn validate_projection(
        &self,
        index: &str,
        columns: &BTreeSet<ColumnHandle>,
    ) -> Result<(), HandleError> {
        match columns.iter().find(|column| !self.reaches(column)) {
            Some(column) => Err(HandleError::UnreachableColumn {
                column: column.qualified_name().to_string(),
                index: index.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn builtin_columns() -> Result<Vec<ColumnHandle>, HandleError> {
    Ok(vec![
        ColumnHandle::try_new(
            crate::decoder::ID_FIELD,
            ColumnType::Varchar,
            DecoderDescriptor::Id,
            PredicateSupport::from_bool(true),
            Vec::new(),
        )?,
        ColumnHandle::try_new(
            crate::decoder::SCORE_FIELD,
            ColumnType::Real,
            DecoderDescriptor::Score,
            PredicateSupport::from_bool(false),
            Vec::new(),
        )?,
        ColumnHandle::try_new(
            crate::decoder::SOURCE_FIELD,
            ColumnType::Varchar,
            DecoderDescriptor::Source,
            PredicateSupport::from_bool(false),
            Vec::new(),
        )?,
    ])
}

fn top_level_column(field: &IndexField) -> Result<Option<ColumnHandle>, HandleError> {
    let Some((column_type, decoder)) = map_field(field, &field.name) else {
        return Ok(None);
    };

    ColumnHandle::try_new(
        field.name.clone(),
        column_type,
        decoder,
        PredicateSupport::classify(&field.index_type),
        Vec::new(),
    )
    .map(Some)
}

// Engine type and decoder for one field; `None` when the field has no
// engine representation.
fn map_field(field: &IndexField, path: &str) -> Option<(ColumnType, DecoderDescriptor)> {
    let (column_type, decoder) = map_type(&field.index_type, path)?;
    if !field.is_array {
        return Some((column_type, decoder));
    }

    Some((
        ColumnType::array(column_type),
        DecoderDescriptor::Array {
            path: path.to_string(),
            element: Box::new(decoder),
        },
    ))
}

fn map_type(index_type: &IndexType, path: &str) -> Option<(ColumnType, DecoderDescriptor)> {
    let path = path.to_string();

    let mapped = match index_type {
        IndexType::Primitive { name } => match name.to_ascii_lowercase().as_str() {
            "boolean" => (ColumnType::Boolean, DecoderDescriptor::Boolean { path }),
            "byte" => (ColumnType::TinyInt, DecoderDescriptor::TinyInt { path }),
            "short" => (ColumnType::SmallInt, DecoderDescriptor::SmallInt { path }),
            "integer" => (ColumnType::Integer, DecoderDescriptor::Integer { path }),
            "long" => (ColumnType::BigInt, DecoderDescriptor::BigInt { path }),
            "float" => (ColumnType::Real, DecoderDescriptor::Real { path }),
            "double" => (ColumnType::Double, DecoderDescriptor::Double { path }),
            "keyword" | "text" => (ColumnType::Varchar, DecoderDescriptor::Varchar { path }),
            "binary" => (ColumnType::Varbinary, DecoderDescriptor::Varbinary { path }),
            _ => return None,
        },
        IndexType::DateTime { .. } => (
            ColumnType::Timestamp {
                precision: TIMESTAMP_PRECISION,
            },
            DecoderDescriptor::Timestamp { path },
        ),
        IndexType::ScaledFloat { .. } => (ColumnType::Double, DecoderDescriptor::Double { path }),
        IndexType::IpAddress => (ColumnType::IpAddress, DecoderDescriptor::IpAddress { path }),
        IndexType::Object { fields } => {
            let mut row_fields = Vec::new();
            let mut decoders = Vec::new();
            for child in fields {
                let child_path = format!("{path}.{}", child.name);
                if let Some((column_type, decoder)) = map_field(child, &child_path) {
                    row_fields.push(RowField::new(child.name.clone(), column_type));
                    decoders.push(RowDecoderField::new(child.name.clone(), decoder));
                }
            }
            if row_fields.is_empty() {
                return None;
            }

            (
                ColumnType::Row { fields: row_fields },
                DecoderDescriptor::Row {
                    path,
                    fields: decoders,
                },
            )
        }
    };

    Some(mapped)
}
