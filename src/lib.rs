//! nsscache - Flat-file name-service caches with binary-search indices.
//!
//! This crate keeps directory-service records (passwd, shadow and group
//! rows) in memory, serializes them to the `:`-separated flat files read by
//! an NSS cache module, and builds sorted fixed-width index files so a
//! lookup can binary search by key instead of scanning the flat file.
//!
//! # Quick Start
//!
//! ```
//! use nsscache::{Cache, Entry, PasswdEntry};
//!
//! let mut cache = Cache::with_acl(|e| e.name() != "nobody");
//! cache.add([
//!     PasswdEntry::new("foo", 1000, 1000).with_shell("/bin/bash"),
//!     PasswdEntry::new("nobody", 65534, 65534),
//! ]);
//!
//! let mut flat = Vec::new();
//! let written = cache.write_to(&mut flat)?;
//! assert_eq!(written, 28);
//!
//! // index on the login name; offsets point into `flat`
//! let index = cache.index(PasswdEntry::NAME_FIELD)?;
//! assert_eq!(index.bytes(), b"foo\x000\n");
//! # Ok::<(), nsscache::Error>(())
//! ```
//!
//! # File Formats
//!
//! - **Flat file**: `field_1:field_2:...:field_N\n` per entry, insertion order
//! - **Index**: `key NUL offset NUL-padding \n` per entry, sorted by key,
//!   every record padded to the same width

mod error;
mod map_kind;

pub mod cache;
pub mod config;
pub mod entry;
pub mod output;
pub mod parse;

// Re-export core types
pub use cache::{Acl, Cache, Index, SharedCache};
pub use entry::{Entry, GroupEntry, PasswdEntry, ShadowEntry};
pub use error::{EntryParseError, Error, Result};
pub use map_kind::MapKind;

pub use config::{AclConfig, Config};
pub use output::write_map_files;
pub use parse::parse_entries;
