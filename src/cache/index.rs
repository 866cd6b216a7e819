//! Sorted fixed-width index over a flat-file cache.
//!
//! Record layout:
//! ```text
//! +-----+-----+----------------+-------------+----+
//! | key | NUL | offset (ASCII) | NUL padding | \n |
//! +-----+-----+----------------+-------------+----+
//! ```
//!
//! Every record is padded to the width of the longest unpadded record, so a
//! lookup client can binary search by seeking to `i * (width + 1)`.

use std::io::Write;

use super::{line_len, write_counted};
use crate::entry::Entry;
use crate::{Error, Result};

/// A built index, ready to be written next to its flat file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Index {
    bytes: Vec<u8>,
    width: usize,
    count: usize,
}

struct Record {
    key_len: usize,
    data: Vec<u8>,
}

impl Record {
    fn key(&self) -> &[u8] {
        &self.data[..self.key_len]
    }
}

impl Index {
    pub(crate) fn build(entries: &[Box<dyn Entry>], field: usize) -> Result<Self> {
        let mut records = Vec::with_capacity(entries.len());
        let mut offset = 0u64;

        for (position, entry) in entries.iter().enumerate() {
            let field_count = entry.field_count();
            let fields = entry.fields();
            let key = match fields.get(field) {
                Some(key) if field < field_count => key,
                _ => {
                    return Err(Error::InvalidFieldIndex {
                        index: field,
                        field_count,
                        position,
                    });
                }
            };

            let offset_text = offset.to_string();
            let mut data = Vec::with_capacity(key.len() + 1 + offset_text.len());
            data.extend_from_slice(key.as_bytes());
            data.push(0);
            data.extend_from_slice(offset_text.as_bytes());

            records.push(Record {
                key_len: key.len(),
                data,
            });
            offset += line_len(&fields) as u64;
        }

        let width = records.iter().map(|r| r.data.len()).max().unwrap_or(0);

        // Stable: equal keys keep insertion order.
        records.sort_by(|a, b| a.key().cmp(b.key()));

        let count = records.len();
        let mut bytes = Vec::with_capacity(count * (width + 1));
        for mut record in records {
            record.data.resize(width, 0);
            bytes.extend_from_slice(&record.data);
            bytes.push(b'\n');
        }

        log::debug!(
            "Built index on field {}: {} records, width {}",
            field,
            count,
            width
        );

        Ok(Self {
            bytes,
            width,
            count,
        })
    }

    /// The serialized index.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Padded record width, not counting the trailing newline.
    pub fn record_width(&self) -> usize {
        self.width
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate over padded records in sorted order, newlines stripped.
    pub fn records(&self) -> impl Iterator<Item = &[u8]> {
        let width = self.width;
        self.bytes
            .chunks_exact(width + 1)
            .map(move |chunk| &chunk[..width])
    }

    /// Write the index to `writer`, with the same partial-count semantics
    /// as [`Cache::write_to`](super::Cache::write_to).
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<u64> {
        let mut written = 0u64;
        write_counted(writer, &self.bytes, &mut written)?;
        Ok(written)
    }
}
