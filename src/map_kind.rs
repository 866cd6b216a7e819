//! Name-service map kinds and their cache file layout.

use std::fmt;

/// A name-service map that can be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    Passwd,
    Shadow,
    Group,
}

impl MapKind {
    /// All supported maps.
    pub const ALL: [MapKind; 3] = [MapKind::Passwd, MapKind::Shadow, MapKind::Group];

    /// Get the string representation.
    pub fn name(&self) -> &'static str {
        match self {
            MapKind::Passwd => "passwd",
            MapKind::Shadow => "shadow",
            MapKind::Group => "group",
        }
    }

    /// File name of the flat-file cache, e.g. `passwd.cache`.
    pub fn cache_file_name(&self) -> String {
        format!("{}.cache", self.name())
    }

    /// Index files built for this map as `(suffix, field)` pairs.
    pub fn indices(&self) -> &'static [(&'static str, usize)] {
        match self {
            MapKind::Passwd => &[("ixname", 0), ("ixuid", 2)],
            MapKind::Shadow => &[("ixname", 0)],
            MapKind::Group => &[("ixname", 0), ("ixgid", 2)],
        }
    }

    /// File name of one index, e.g. `passwd.cache.ixuid`.
    pub fn index_file_name(&self, suffix: &str) -> String {
        format!("{}.{}", self.cache_file_name(), suffix)
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for MapKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        MapKind::ALL
            .into_iter()
            .find(|map| map.name() == lower)
            .ok_or_else(|| {
                let known: Vec<&str> = MapKind::ALL.iter().map(|m| m.name()).collect();
                crate::Error::Config(format!(
                    "unknown map: {} (expected one of {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}
