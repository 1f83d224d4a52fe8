//! Deterministic handle fingerprinting for plan caches that outlive one process.

use crate::{
    decoder::DecoderDescriptor,
    domain::{Domain, Marker, TupleDomain, ValueSet},
    handle::{ColumnHandle, TableHandle, TableKind},
    predicate::PredicateSupport,
    types::ColumnType,
    value::Literal,
};
use sha2::{Digest, Sha256};
use std::fmt::{self, Write as _};

///
/// HandleFingerprint
///
/// Stable SHA-256 over every attribute of a table handle.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HandleFingerprint([u8; 32]);

impl HandleFingerprint {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

impl fmt::Display for HandleFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl TableHandle {
    /// Compute a stable fingerprint for this handle.
    #[must_use]
    pub fn fingerprint(&self) -> HandleFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(b"tablefp:v1");

        write_tag(&mut hasher, 0x01);
        write_tag(
            &mut hasher,
            match self.kind() {
                TableKind::Scan => 0x01,
                TableKind::Query => 0x02,
            },
        );
        write_str(&mut hasher, self.schema());
        write_str(&mut hasher, self.index());

        write_tag(&mut hasher, 0x02);
        hash_tuple_domain(&mut hasher, self.constraint());

        write_tag(&mut hasher, 0x03);
        write_len_u32(&mut hasher, self.regexes().len());
        for (column, pattern) in self.regexes() {
            write_str(&mut hasher, column);
            write_str(&mut hasher, pattern);
        }

        write_tag(&mut hasher, 0x04);
        write_opt_str(&mut hasher, self.query());

        write_tag(&mut hasher, 0x05);
        match self.limit() {
            Some(limit) => {
                write_tag(&mut hasher, 0x01);
                hasher.update(limit.to_be_bytes());
            }
            None => write_tag(&mut hasher, 0x00),
        }

        write_tag(&mut hasher, 0x06);
        write_len_u32(&mut hasher, self.projected_columns().len());
        for column in self.projected_columns() {
            hash_column(&mut hasher, column);
        }

        HandleFingerprint(hasher.finalize().into())
    }
}

fn hash_column(hasher: &mut Sha256, column: &ColumnHandle) {
    write_str(hasher, column.name());
    hash_column_type(hasher, column.column_type());
    hash_decoder(hasher, column.decoder());
    hash_predicate_support(hasher, column.predicate_support());
    write_len_u32(hasher, column.dereference_path().len());
    for segment in column.dereference_path() {
        write_str(hasher, segment);
    }
}

fn hash_column_type(hasher: &mut Sha256, column_type: &ColumnType) {
    match column_type {
        ColumnType::Boolean => write_tag(hasher, 0x10),
        ColumnType::TinyInt => write_tag(hasher, 0x11),
        ColumnType::SmallInt => write_tag(hasher, 0x12),
        ColumnType::Integer => write_tag(hasher, 0x13),
        ColumnType::BigInt => write_tag(hasher, 0x14),
        ColumnType::Real => write_tag(hasher, 0x15),
        ColumnType::Double => write_tag(hasher, 0x16),
        ColumnType::Varchar => write_tag(hasher, 0x17),
        ColumnType::Varbinary => write_tag(hasher, 0x18),
        ColumnType::Timestamp { precision } => {
            write_tag(hasher, 0x19);
            write_tag(hasher, *precision);
        }
        ColumnType::IpAddress => write_tag(hasher, 0x1a),
        ColumnType::Array { element } => {
            write_tag(hasher, 0x1b);
            hash_column_type(hasher, element);
        }
        ColumnType::Row { fields } => {
            write_tag(hasher, 0x1c);
            write_len_u32(hasher, fields.len());
            for field in fields {
                write_str(hasher, &field.name);
                hash_column_type(hasher, &field.column_type);
            }
        }
    }
}

fn hash_decoder(hasher: &mut Sha256, decoder: &DecoderDescriptor) {
    let tag = match decoder {
        DecoderDescriptor::Boolean { .. } => 0x20,
        DecoderDescriptor::TinyInt { .. } => 0x21,
        DecoderDescriptor::SmallInt { .. } => 0x22,
        DecoderDescriptor::Integer { .. } => 0x23,
        DecoderDescriptor::BigInt { .. } => 0x24,
        DecoderDescriptor::Real { .. } => 0x25,
        DecoderDescriptor::Double { .. } => 0x26,
        DecoderDescriptor::Varchar { .. } => 0x27,
        DecoderDescriptor::Varbinary { .. } => 0x28,
        DecoderDescriptor::Timestamp { .. } => 0x29,
        DecoderDescriptor::IpAddress { .. } => 0x2a,
        DecoderDescriptor::Array { .. } => 0x2b,
        DecoderDescriptor::Row { .. } => 0x2c,
        DecoderDescriptor::Id => 0x2d,
        DecoderDescriptor::Score => 0x2e,
        DecoderDescriptor::Source => 0x2f,
    };
    write_tag(hasher, tag);
    write_str(hasher, decoder.path());

    match decoder {
        DecoderDescriptor::Array { element, .. } => hash_decoder(hasher, element),
        DecoderDescriptor::Row { fields, .. } => {
            write_len_u32(hasher, fields.len());
            for field in fields {
                write_str(hasher, &field.name);
                hash_decoder(hasher, &field.decoder);
            }
        }
        _ => {}
    }
}

fn hash_predicate_support(hasher: &mut Sha256, support: &PredicateSupport) {
    write_tag(hasher, u8::from(support.supports_predicates()));
    write_len_u32(hasher, support.children().len());
    for (name, child) in support.children() {
        write_str(hasher, name);
        hash_predicate_support(hasher, child);
    }
}

fn hash_tuple_domain(hasher: &mut Sha256, tuple: &TupleDomain<ColumnHandle>) {
    let Some(domains) = tuple.domains() else {
        write_tag(hasher, 0x30);
        return;
    };

    write_tag(hasher, 0x31);
    write_len_u32(hasher, domains.len());
    for (column, domain) in domains {
        hash_column(hasher, column);
        hash_domain(hasher, domain);
    }
}

fn hash_domain(hasher: &mut Sha256, domain: &Domain) {
    write_tag(hasher, u8::from(domain.is_null_allowed()));
    match domain.values() {
        ValueSet::All => write_tag(hasher, 0x32),
        ValueSet::None => write_tag(hasher, 0x33),
        ValueSet::Ranges(ranges) => {
            write_tag(hasher, 0x34);
            write_len_u32(hasher, ranges.len());
            for range in ranges {
                hash_marker(hasher, range.low());
                hash_marker(hasher, range.high());
            }
        }
    }
}

fn hash_marker(hasher: &mut Sha256, marker: &Marker) {
    match marker {
        Marker::Unbounded => write_tag(hasher, 0x35),
        Marker::Inclusive(value) => {
            write_tag(hasher, 0x36);
            hash_literal(hasher, value);
        }
        Marker::Exclusive(value) => {
            write_tag(hasher, 0x37);
            hash_literal(hasher, value);
        }
    }
}

fn hash_literal(hasher: &mut Sha256, literal: &Literal) {
    write_tag(hasher, literal.tag());
    match literal {
        Literal::Boolean(v) => write_tag(hasher, u8::from(*v)),
        Literal::Integer(v) | Literal::Timestamp(v) => hasher.update(v.to_be_bytes()),
        Literal::Double(v) => hasher.update(v.to_be_bytes()),
        Literal::Varchar(v) => write_str(hasher, v),
    }
}

///
/// Encode one optional string with a presence tag.
///

fn write_opt_str(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(value) => {
            write_tag(hasher, 0x01);
            write_str(hasher, value);
        }
        None => write_tag(hasher, 0x00),
    }
}

///
/// Encode one string with length prefix into the hash stream.
///

fn write_str(hasher: &mut Sha256, value: &str) {
    write_len_u32(hasher, value.len());
    hasher.update(value.as_bytes());
}

/// Encode a platform-sized length as u32 with deterministic saturation.
fn write_len_u32(hasher: &mut Sha256, len: usize) {
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    hasher.update(len.to_be_bytes());
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}
