//! Shadow password rows.

use std::str::FromStr;

use super::{format_optional, parse_optional, split_fields, Entry};
use crate::error::EntryParseError;
use crate::MapKind;

/// One `shadow(5)` row. Absent aging fields serialize as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShadowEntry {
    pub name: String,
    pub passwd: String,
    pub lstchg: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub warn: Option<i64>,
    pub inact: Option<i64>,
    pub expire: Option<i64>,
    pub flag: Option<u64>,
}

impl ShadowEntry {
    pub const FIELD_COUNT: usize = 9;
    pub const NAME_FIELD: usize = 0;

    /// Create a locked entry with no aging information.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passwd: "!".to_string(),
            ..Default::default()
        }
    }
}

impl Entry for ShadowEntry {
    fn fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.passwd.clone(),
            format_optional(self.lstchg),
            format_optional(self.min),
            format_optional(self.max),
            format_optional(self.warn),
            format_optional(self.inact),
            format_optional(self.expire),
            format_optional(self.flag),
        ]
    }

    fn field_count(&self) -> usize {
        Self::FIELD_COUNT
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn map(&self) -> MapKind {
        MapKind::Shadow
    }
}

impl FromStr for ShadowEntry {
    type Err = EntryParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts = split_fields(line, Self::FIELD_COUNT)?;
        Ok(Self {
            name: parts[0].to_string(),
            passwd: parts[1].to_string(),
            lstchg: parse_optional("lstchg", parts[2])?,
            min: parse_optional("min", parts[3])?,
            max: parse_optional("max", parts[4])?,
            warn: parse_optional("warn", parts[5])?,
            inact: parse_optional("inact", parts[6])?,
            expire: parse_optional("expire", parts[7])?,
            flag: parse_optional("flag", parts[8])?,
        })
    }
}
