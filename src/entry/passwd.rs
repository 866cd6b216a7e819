//! Password database rows.

use std::str::FromStr;

use super::{parse_id, split_fields, Entry};
use crate::error::EntryParseError;
use crate::MapKind;

/// One `passwd(5)` row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PasswdEntry {
    pub name: String,
    pub passwd: String,
    pub uid: u32,
    pub gid: u32,
    pub gecos: String,
    pub dir: String,
    pub shell: String,
}

impl PasswdEntry {
    /// Number of fields in a passwd row.
    pub const FIELD_COUNT: usize = 7;
    /// Index of the login name field.
    pub const NAME_FIELD: usize = 0;
    /// Index of the numeric user id field.
    pub const UID_FIELD: usize = 2;

    /// Create an entry with a shadowed password and empty descriptive fields.
    pub fn new(name: impl Into<String>, uid: u32, gid: u32) -> Self {
        Self {
            name: name.into(),
            passwd: "x".to_string(),
            uid,
            gid,
            ..Default::default()
        }
    }

    pub fn with_gecos(mut self, gecos: impl Into<String>) -> Self {
        self.gecos = gecos.into();
        self
    }

    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Entry for PasswdEntry {
    fn fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.passwd.clone(),
            self.uid.to_string(),
            self.gid.to_string(),
            self.gecos.clone(),
            self.dir.clone(),
            self.shell.clone(),
        ]
    }

    fn field_count(&self) -> usize {
        Self::FIELD_COUNT
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn map(&self) -> MapKind {
        MapKind::Passwd
    }
}

impl FromStr for PasswdEntry {
    type Err = EntryParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts = split_fields(line, Self::FIELD_COUNT)?;
        Ok(Self {
            name: parts[0].to_string(),
            passwd: parts[1].to_string(),
            uid: parse_id("uid", parts[2])?,
            gid: parse_id("gid", parts[3])?,
            gecos: parts[4].to_string(),
            dir: parts[5].to_string(),
            shell: parts[6].to_string(),
        })
    }
}
