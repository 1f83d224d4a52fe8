//! Semantic column types as the engine sees them.

use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ColumnType
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(tag = "base", rename_all = "snake_case")]
pub enum ColumnType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Varchar,
    Varbinary,
    Timestamp { precision: u8 },
    IpAddress,
    Array { element: Box<Self> },
    Row { fields: Vec<RowField> },
}

impl ColumnType {
    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    /// Type of a named row field, `None` for non-row types or unknown names.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Row { fields } => fields
                .iter()
                .find(|field| field.name == name)
                .map(|field| &field.column_type),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::TinyInt => f.write_str("tinyint"),
            Self::SmallInt => f.write_str("smallint"),
            Self::Integer => f.write_str("integer"),
            Self::BigInt => f.write_str("bigint"),
            Self::Real => f.write_str("real"),
            Self::Double => f.write_str("double"),
            Self::Varchar => f.write_str("varchar"),
            Self::Varbinary => f.write_str("varbinary"),
            Self::Timestamp { precision } => write!(f, "timestamp({precision})"),
            Self::IpAddress => f.write_str("ipaddress"),
            Self::Array { element } => write!(f, "array({element})"),
            Self::Row { fields } => {
                f.write_str("row(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", field.name, field.column_type)?;
                }
                f.write_str(")")
            }
        }
    }
}

///
/// RowField
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct RowField {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl RowField {
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sql_names() {
        let row = ColumnType::Row {
            fields: vec![
                RowField::new("c", ColumnType::Varchar),
                RowField::new("d", ColumnType::Timestamp { precision: 3 }),
            ],
        };

        assert_eq!(row.to_string(), "row(c varchar, d timestamp(3))");
        assert_eq!(ColumnType::array(ColumnType::BigInt).to_string(), "array(bigint)");
    }

    #[test]
    fn field_lookup_only_on_rows() {
        let row = ColumnType::Row {
            fields: vec![RowField::new("c", ColumnType::Varchar)],
        };

        assert_eq!(row.field("c"), Some(&ColumnType::Varchar));
        assert_eq!(row.field("missing"), None);
        assert_eq!(ColumnType::Varchar.field("c"), None);
    }
}
