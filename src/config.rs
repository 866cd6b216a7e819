//! Generator configuration.
//!
//! ```yaml
//! output_dir: /var/lib/misc
//! maps:
//!   - map: passwd
//!     source: /srv/export/passwd
//!   - map: group
//!     source: /srv/export/group
//! acl:
//!   min_id: 1000
//!   deny: [nobody]
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::Cache;
use crate::entry::Entry;
use crate::{Error, GroupEntry, MapKind, PasswdEntry, Result};

/// Top-level generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory the cache and index files are written to
    pub output_dir: PathBuf,
    /// Maps to generate
    pub maps: Vec<MapSource>,
    /// Optional access control applied to every map
    #[serde(default)]
    pub acl: Option<AclConfig>,
}

/// A map and the flat file it is read from.
#[derive(Debug, Clone, Deserialize)]
pub struct MapSource {
    pub map: String,
    pub source: PathBuf,
}

impl MapSource {
    pub fn kind(&self) -> Result<MapKind> {
        self.map.parse()
    }
}

/// Declarative access-control rules.
///
/// An entry is accepted when its name is not denied, and either it is
/// explicitly allowed or its numeric id lies within `[min_id, max_id]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AclConfig {
    #[serde(default)]
    pub min_id: Option<u32>,
    #[serde(default)]
    pub max_id: Option<u32>,
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub deny: Vec<String>,
}

impl AclConfig {
    /// Evaluate the rules against one entry.
    pub fn accepts(&self, entry: &dyn Entry) -> bool {
        let name = entry.name();
        if self.deny.iter().any(|d| d == name) {
            return false;
        }
        if self.allow.iter().any(|a| a == name) {
            return true;
        }
        if self.min_id.is_none() && self.max_id.is_none() {
            return true;
        }

        let id_field = match entry.map() {
            MapKind::Passwd => Some(PasswdEntry::UID_FIELD),
            MapKind::Group => Some(GroupEntry::GID_FIELD),
            MapKind::Shadow => None,
        };
        let id = id_field.and_then(|f| entry.fields().get(f)?.parse::<u32>().ok());
        match id {
            Some(id) => {
                self.min_id.map_or(true, |min| id >= min)
                    && self.max_id.map_or(true, |max| id <= max)
            }
            None => true,
        }
    }

    /// Build a cache that filters with these rules.
    pub fn into_cache(self) -> Cache {
        Cache::with_acl(move |entry| self.accepts(entry))
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.maps.is_empty() {
            return Err(Error::Config("no maps configured".to_string()));
        }
        for source in &self.maps {
            source.kind()?;
        }
        if let Some(acl) = &self.acl {
            if let (Some(min), Some(max)) = (acl.min_id, acl.max_id) {
                if min > max {
                    return Err(Error::Config(format!(
                        "acl min_id {} exceeds max_id {}",
                        min, max
                    )));
                }
            }
        }
        Ok(())
    }

    /// A fresh cache carrying the configured ACL, if any.
    pub fn new_cache(&self) -> Cache {
        match &self.acl {
            Some(acl) => acl.clone().into_cache(),
            None => Cache::new(),
        }
    }
}
