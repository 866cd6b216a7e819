//! Directory-service entry types.
//!
//! Every map variant exposes its fields as an ordered list of strings so
//! that the cache can serialize and index entries without knowing which
//! concrete variant it holds.

mod group;
mod passwd;
mod shadow;

pub use group::GroupEntry;
pub use passwd::PasswdEntry;
pub use shadow::ShadowEntry;

use std::fmt;

use crate::error::EntryParseError;
use crate::MapKind;

/// Field separator of the flat-file format.
pub const SEPARATOR: u8 = b':';

/// A single directory-service record.
pub trait Entry: fmt::Debug + Send + Sync {
    /// All fields in display order, numbers rendered as plain decimals.
    fn fields(&self) -> Vec<String>;

    /// Number of fields; fixed per variant.
    fn field_count(&self) -> usize;

    /// Value of the name field.
    fn name(&self) -> &str;

    /// Map this entry belongs to.
    fn map(&self) -> MapKind;

    /// Field used as the default lookup key.
    fn key_field(&self) -> usize {
        0
    }
}

macro_rules! impl_into_boxed_entry {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Box<dyn Entry> {
                fn from(entry: $ty) -> Self {
                    Box::new(entry)
                }
            }
        )*
    };
}

impl_into_boxed_entry!(PasswdEntry, ShadowEntry, GroupEntry);

/// Split a line into exactly `expected` fields.
pub(crate) fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, EntryParseError> {
    let parts: Vec<&str> = line.split(SEPARATOR as char).collect();
    if parts.len() != expected {
        return Err(EntryParseError::FieldCount {
            expected,
            actual: parts.len(),
        });
    }
    if parts[0].is_empty() {
        return Err(EntryParseError::EmptyName);
    }
    Ok(parts)
}

/// Parse an unsigned id, rejecting signs and other non-digit text.
pub(crate) fn parse_id(field: &'static str, value: &str) -> Result<u32, EntryParseError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EntryParseError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| EntryParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Parse an optional numeric field where the empty string means absent.
pub(crate) fn parse_optional<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<Option<T>, EntryParseError> {
    if value.is_empty() {
        return Ok(None);
    }
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EntryParseError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| EntryParseError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

pub(crate) fn format_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a:b:c", 3).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(
            split_fields("a:b", 3),
            Err(EntryParseError::FieldCount {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(split_fields(":b:c", 3), Err(EntryParseError::EmptyName));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("uid", "1000").unwrap(), 1000);
        assert_eq!(parse_id("uid", "0").unwrap(), 0);
        assert!(parse_id("uid", "").is_err());
        assert!(parse_id("uid", "+5").is_err());
        assert!(parse_id("uid", "-1").is_err());
        assert!(parse_id("uid", "4294967296").is_err());
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(parse_optional::<i64>("min", "").unwrap(), None);
        assert_eq!(parse_optional::<i64>("min", "7").unwrap(), Some(7));
        assert_eq!(parse_optional::<i64>("min", "-1").unwrap(), Some(-1));
        assert!(parse_optional::<i64>("min", "-").is_err());
        assert!(parse_optional::<u64>("flag", "x1").is_err());
    }

    #[test]
    fn test_boxed_entry_dispatch() {
        let entries: Vec<Box<dyn Entry>> = vec![
            PasswdEntry::new("foo", 1000, 1000).into(),
            GroupEntry::new("users", 100).into(),
        ];
        assert_eq!(entries[0].field_count(), 7);
        assert_eq!(entries[1].field_count(), 4);
        assert_eq!(entries[1].map(), MapKind::Group);
    }

    #[test]
    fn test_key_field_is_name() {
        let entry = ShadowEntry::new("foo");
        assert_eq!(entry.fields()[entry.key_field()], entry.name());
        assert_eq!(PasswdEntry::new("bar", 1, 1).key_field(), PasswdEntry::NAME_FIELD);
    }
}
