//! In-memory cache of accepted entries.
//!
//! The cache serializes to the flat-file format consumed by the NSS
//! lookup layer:
//!
//! ```text
//! field_1:field_2:...:field_N\n     one line per entry, insertion order
//! ```
//!
//! and builds sorted fixed-width indices over that output (see [`Index`]).
//! Line lengths are derived by [`line_len`] for both paths, so index offsets
//! always agree with what [`Cache::write_to`] emits.

mod index;
mod shared;

pub use index::Index;
pub use shared::SharedCache;

use std::fmt;
use std::io::{self, Write};

use crate::entry::{Entry, SEPARATOR};
use crate::{Error, Result};

/// Access-control predicate evaluated once per entry at add time.
pub type Acl = Box<dyn Fn(&dyn Entry) -> bool + Send + Sync>;

/// Ordered collection of entries destined for a flat-file cache.
pub struct Cache {
    entries: Vec<Box<dyn Entry>>,
    acl: Option<Acl>,
}

impl Cache {
    /// Create an empty cache that accepts every entry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            acl: None,
        }
    }

    /// Create an empty cache that only keeps entries accepted by `acl`.
    pub fn with_acl<F>(acl: F) -> Self
    where
        F: Fn(&dyn Entry) -> bool + Send + Sync + 'static,
    {
        Self {
            entries: Vec::new(),
            acl: Some(Box::new(acl)),
        }
    }

    /// Append entries in the given order.
    ///
    /// Entries rejected by the ACL are dropped without signal. Entries whose
    /// fields contain `:`, a newline or NUL are dropped with a warning, since
    /// storing them would break the line and index framing.
    pub fn add<I, E>(&mut self, entries: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<Box<dyn Entry>>,
    {
        let mut accepted = 0usize;
        let mut rejected = 0usize;

        for entry in entries {
            let entry = entry.into();
            if let Some(acl) = &self.acl {
                if !acl(entry.as_ref()) {
                    rejected += 1;
                    continue;
                }
            }
            if let Some(field) = framing_violation(entry.as_ref()) {
                log::warn!(
                    "Dropping {} entry {:?}: field {} contains a framing byte",
                    entry.map(),
                    entry.name(),
                    field
                );
                rejected += 1;
                continue;
            }
            self.entries.push(entry);
            accepted += 1;
        }

        log::debug!(
            "Cache add: {} accepted, {} rejected, {} total",
            accepted,
            rejected,
            self.entries.len()
        );
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over stored entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Entry> {
        self.entries.iter().map(|e| e.as_ref())
    }

    /// Total size of the flat-file serialization in bytes.
    pub fn serialized_len(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| line_len(&e.fields()) as u64)
            .sum()
    }

    /// Write every stored entry as one `:`-joined line to `writer`.
    ///
    /// Returns the number of bytes written. On failure the error carries
    /// the count of bytes the sink accepted first; nothing is rolled back.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<u64> {
        let mut written = 0u64;
        let mut line = Vec::with_capacity(128);

        for entry in &self.entries {
            line.clear();
            encode_line(&entry.fields(), &mut line);
            write_counted(writer, &line, &mut written)?;
        }

        Ok(written)
    }

    /// Serialize the flat file into memory.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len() as usize);
        for entry in &self.entries {
            encode_line(&entry.fields(), &mut out);
        }
        out
    }

    /// Build a sorted index keyed on field `field`.
    pub fn index(&self, field: usize) -> Result<Index> {
        Index::build(&self.entries, field)
    }

    /// Build the index on the entries' default lookup key.
    pub fn key_index(&self) -> Result<Index> {
        let field = self.entries.first().map_or(0, |e| e.key_field());
        self.index(field)
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("entries", &self.entries)
            .field("acl", &self.acl.is_some())
            .finish()
    }
}

/// Byte length of the serialized line for `fields`, newline included.
pub(crate) fn line_len(fields: &[String]) -> usize {
    let content: usize = fields.iter().map(String::len).sum();
    content + fields.len().saturating_sub(1) + 1
}

/// Append the serialized line for `fields` to `out`, returning its length.
pub(crate) fn encode_line(fields: &[String], out: &mut Vec<u8>) -> usize {
    let start = out.len();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.extend_from_slice(field.as_bytes());
    }
    out.push(b'\n');

    let len = out.len() - start;
    debug_assert_eq!(len, line_len(fields));
    len
}

/// Write `buf` fully, adding accepted bytes to `written` as they land.
pub(crate) fn write_counted<W: Write + ?Sized>(
    writer: &mut W,
    mut buf: &[u8],
    written: &mut u64,
) -> Result<()> {
    while !buf.is_empty() {
        match writer.write(buf) {
            Ok(0) => {
                return Err(Error::Write {
                    written: *written,
                    source: io::Error::new(io::ErrorKind::WriteZero, "sink accepted no bytes"),
                });
            }
            Ok(n) => {
                *written += n as u64;
                buf = &buf[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                return Err(Error::Write {
                    written: *written,
                    source: e,
                });
            }
        }
    }
    Ok(())
}

fn framing_violation(entry: &dyn Entry) -> Option<usize> {
    entry
        .fields()
        .iter()
        .position(|f| f.bytes().any(|b| b == SEPARATOR || b == b'\n' || b == 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupEntry, PasswdEntry, ShadowEntry};

    fn foo() -> PasswdEntry {
        PasswdEntry::new("foo", 1000, 1000)
            .with_gecos("Mr Foo")
            .with_dir("/home/foo")
            .with_shell("/bin/bash")
    }

    /// Sink that accepts `limit` bytes, then fails.
    struct LimitedWriter {
        limit: usize,
        data: Vec<u8>,
    }

    impl Write for LimitedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.limit - self.data.len();
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "full"));
            }
            let n = room.min(buf.len());
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_line_len_matches_encoding() {
        let fields = foo().fields();
        let mut buf = Vec::new();
        encode_line(&fields, &mut buf);
        assert_eq!(buf.len(), line_len(&fields));
        assert_eq!(line_len(&fields), 43);
    }

    #[test]
    fn test_encode_line_reports_line_len() {
        let entries: Vec<Box<dyn Entry>> = vec![
            foo().into(),
            ShadowEntry::new("foo").into(),
            GroupEntry::new("wheel", 10).with_members(["a", "b"]).into(),
            PasswdEntry::default().into(),
        ];
        let mut out = Vec::new();
        for entry in &entries {
            let before = out.len();
            let fields = entry.fields();
            let n = encode_line(&fields, &mut out);
            assert_eq!(n, line_len(&fields));
            assert_eq!(out.len() - before, n);
        }
    }

    #[test]
    fn test_key_index_uses_name_field() {
        let mut cache = Cache::new();
        cache.add([foo(), PasswdEntry::new("admin", 1002, 1000)]);
        assert_eq!(
            cache.key_index().unwrap(),
            cache.index(PasswdEntry::NAME_FIELD).unwrap()
        );
        assert!(Cache::new().key_index().unwrap().is_empty());
    }

    #[test]
    fn test_line_len_no_fields() {
        assert_eq!(line_len(&[]), 1);
        let mut buf = Vec::new();
        encode_line(&[], &mut buf);
        assert_eq!(buf, b"\n");
    }

    #[test]
    fn test_empty_cache_writes_nothing() {
        let cache = Cache::new();
        let mut out = Vec::new();
        assert_eq!(cache.write_to(&mut out).unwrap(), 0);
        assert!(out.is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_write_to_matches_to_bytes() {
        let mut cache = Cache::new();
        cache.add([foo()]);
        cache.add([GroupEntry::new("users", 100).with_members(["foo"])]);

        let mut out = Vec::new();
        let n = cache.write_to(&mut out).unwrap();
        assert_eq!(n, cache.serialized_len());
        assert_eq!(out, cache.to_bytes());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_partial_write_reports_count() {
        let mut cache = Cache::new();
        cache.add([foo(), foo()]);

        let mut sink = LimitedWriter {
            limit: 50,
            data: Vec::new(),
        };
        let err = cache.write_to(&mut sink).unwrap_err();
        assert_eq!(err.bytes_written(), Some(50));
        assert_eq!(sink.data.len(), 50);
        // state untouched
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_length_write_is_error() {
        struct ZeroWriter;
        impl Write for ZeroWriter {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut cache = Cache::new();
        cache.add([foo()]);
        let err = cache.write_to(&mut ZeroWriter).unwrap_err();
        assert!(matches!(err, Error::Write { written: 0, .. }));
    }

    #[test]
    fn test_acl_sees_every_variant() {
        let mut cache = Cache::with_acl(|e| e.map() != crate::MapKind::Shadow);
        let mixed: Vec<Box<dyn Entry>> = vec![
            foo().into(),
            ShadowEntry::new("foo").into(),
            GroupEntry::new("users", 100).into(),
        ];
        cache.add(mixed);
        let names: Vec<_> = cache.iter().map(|e| e.map()).collect();
        assert_eq!(names, vec![crate::MapKind::Passwd, crate::MapKind::Group]);
    }

    #[test]
    fn test_framing_bytes_rejected_at_add() {
        let mut cache = Cache::new();
        cache.add([
            foo().with_gecos("a:b"),
            foo().with_gecos("line\nbreak"),
            foo().with_dir("/nul\0"),
            foo(),
        ]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.to_bytes(), b"foo:x:1000:1000:Mr Foo:/home/foo:/bin/bash\n");
    }

    #[test]
    fn test_duplicates_kept() {
        let mut cache = Cache::new();
        cache.add([foo(), foo()]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.serialized_len(), 86);
    }

    #[test]
    fn test_debug_hides_acl() {
        let cache = Cache::with_acl(|_| true);
        let debug = format!("{:?}", cache);
        assert!(debug.contains("acl: true"));
    }
}
