//! Thread-safe wrapper around [`Cache`].

use parking_lot::RwLock;
use std::io::Write;

use super::{Cache, Index};
use crate::entry::Entry;
use crate::Result;

/// A [`Cache`] behind a read-write lock.
///
/// Adds take the write lock; serialization and index builds take the read
/// lock, so a reader never observes a half-applied add.
#[derive(Debug, Default)]
pub struct SharedCache {
    inner: RwLock<Cache>,
}

impl SharedCache {
    pub fn new(cache: Cache) -> Self {
        Self {
            inner: RwLock::new(cache),
        }
    }

    pub fn add<I, E>(&self, entries: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<Box<dyn Entry>>,
    {
        self.inner.write().add(entries);
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<u64> {
        self.inner.read().write_to(writer)
    }

    pub fn index(&self, field: usize) -> Result<Index> {
        self.inner.read().index(field)
    }

    /// Write the flat file and build indices under one read lock, so the
    /// offsets in every index match the written bytes.
    pub fn snapshot<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        fields: &[usize],
    ) -> Result<(u64, Vec<Index>)> {
        let guard = self.inner.read();
        let written = guard.write_to(writer)?;
        let indices = fields
            .iter()
            .map(|&field| guard.index(field))
            .collect::<Result<Vec<_>>>()?;
        Ok((written, indices))
    }

    pub fn into_inner(self) -> Cache {
        self.inner.into_inner()
    }
}
