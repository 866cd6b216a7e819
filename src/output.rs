//! Atomic cache file output.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::cache::{Cache, Index};
use crate::{Error, MapKind, Result};

/// Write `<map>.cache` and every index file of `map` into `dir`.
///
/// Every file is first written and synced to its own temp file in `dir`.
/// Only then are they renamed into place, indices first and the flat file
/// last, so a failure while staging leaves the previous generation intact
/// and the flat file never gets ahead of a failed index rename.
pub fn write_map_files(cache: &Cache, map: MapKind, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let indices = map
        .indices()
        .iter()
        .map(|&(suffix, field)| cache.index(field).map(|index| (suffix, index)))
        .collect::<Result<Vec<(&str, Index)>>>()?;

    let mut staged = Vec::with_capacity(indices.len() + 1);
    for (suffix, index) in &indices {
        let path = dir.join(map.index_file_name(suffix));
        let temp = stage(dir, |file| index.write_to(file))?;
        log::debug!(
            "Staged {:?} ({} records, width {})",
            path,
            index.len(),
            index.record_width()
        );
        staged.push((temp, path));
    }

    let cache_path = dir.join(map.cache_file_name());
    let temp = stage(dir, |file| cache.write_to(file))?;
    staged.push((temp, cache_path));

    let mut written = Vec::with_capacity(staged.len());
    for (temp, path) in staged {
        temp.persist(&path).map_err(|e| Error::Io(e.error))?;
        log::info!("Wrote {:?}", path);
        written.push(path);
    }

    log::info!(
        "Updated {} map: {} entries, {} bytes",
        map,
        cache.len(),
        cache.serialized_len()
    );
    Ok(written)
}

/// Write one file's contents to a synced temp file in `dir`.
fn stage<F>(dir: &Path, write: F) -> Result<NamedTempFile>
where
    F: FnOnce(&mut NamedTempFile) -> Result<u64>,
{
    let mut temp = NamedTempFile::new_in(dir)?;

    // on error the temp file is removed when dropped
    write(&mut temp)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    Ok(temp)
}
