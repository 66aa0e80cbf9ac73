//! Cache manifest I/O
//!
//! The manifest is a small JSON file listing every cached folder record. It is
//! the single source of truth for the cache; the folders directory is never
//! re-scanned to reconstruct it. Reads and writes take `fs2` advisory locks so
//! a GUI shell and a CLI invocation cannot corrupt the file by interleaving
//! (lock → truncate → write, in that order).

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use fs2::FileExt;

use crate::error::{FusionError, Result};
use crate::models::CachedFolderRecord;

fn io_err(path: &Path, e: std::io::Error) -> FusionError {
    FusionError::io(path, e)
}

/// Load all records from the manifest. A missing manifest is an empty cache.
pub fn load_manifest(path: &Path) -> Result<Vec<CachedFolderRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(|e| io_err(path, e))?;
    file.lock_shared().map_err(|e| io_err(path, e))?;
    let mut content = String::new();
    BufReader::new(&file)
        .read_to_string(&mut content)
        .map_err(|e| io_err(path, e))?;

    let records = serde_json::from_str(&content)
        .map_err(|e| io_err(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    Ok(records)
}

/// Write all records to the manifest, replacing its previous contents.
///
/// The exclusive lock is acquired before truncation so a concurrent reader
/// never observes a half-written file.
pub fn flush_manifest(path: &Path, records: &[CachedFolderRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| io_err(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| io_err(path, e))?;
    file.lock_exclusive().map_err(|e| io_err(path, e))?;
    // Truncate after taking the lock so a concurrent reader never sees an
    // empty manifest.
    file.set_len(0).map_err(|e| io_err(path, e))?;
    let mut writer = BufWriter::new(&file);
    writer
        .write_all(json.as_bytes())
        .map_err(|e| io_err(path, e))?;
    writer.flush().map_err(|e| io_err(path, e))?;
    Ok(())
}
