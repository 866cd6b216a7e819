//! Group database rows.

use std::str::FromStr;

use super::{parse_id, split_fields, Entry};
use crate::error::EntryParseError;
use crate::MapKind;

/// One `group(5)` row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupEntry {
    pub name: String,
    pub passwd: String,
    pub gid: u32,
    pub members: Vec<String>,
}

impl GroupEntry {
    pub const FIELD_COUNT: usize = 4;
    pub const NAME_FIELD: usize = 0;
    /// Index of the numeric group id field.
    pub const GID_FIELD: usize = 2;

    pub fn new(name: impl Into<String>, gid: u32) -> Self {
        Self {
            name: name.into(),
            passwd: "x".to_string(),
            gid,
            members: Vec::new(),
        }
    }

    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }
}

impl Entry for GroupEntry {
    fn fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.passwd.clone(),
            self.gid.to_string(),
            self.members.join(","),
        ]
    }

    fn field_count(&self) -> usize {
        Self::FIELD_COUNT
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn map(&self) -> MapKind {
        MapKind::Group
    }
}

impl FromStr for GroupEntry {
    type Err = EntryParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts = split_fields(line, Self::FIELD_COUNT)?;
        let members = if parts[3].is_empty() {
            Vec::new()
        } else {
            parts[3].split(',').map(str::to_string).collect()
        };
        Ok(Self {
            name: parts[0].to_string(),
            passwd: parts[1].to_string(),
            gid: parse_id("gid", parts[2])?,
            members,
        })
    }
}
