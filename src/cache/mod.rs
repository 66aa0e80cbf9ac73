//! Empty-folder cache
//!
//! After a move-semantics merge drains a source root, the root is relocated
//! into a cache area instead of being deleted outright, so the caller can
//! restore it later (to its original place or elsewhere) or discard it for
//! good. The cache is a caller-owned index with an explicit load/flush
//! lifecycle; there is no process-wide singleton.

mod manifest;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{FusionError, Result};
use crate::models::CachedFolderRecord;

pub use manifest::{flush_manifest, load_manifest};

const MANIFEST_FILE: &str = "manifest.json";
const FOLDERS_DIR: &str = "folders";

/// True when the tree at `path` contains no files anywhere. Empty
/// subdirectories are allowed; "drained" means all file content is gone.
pub fn is_drained(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let entries = fs::read_dir(path).map_err(|e| FusionError::io(path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| FusionError::io(path, e))?;
        let child = entry.path();
        if child.is_dir() {
            if !is_drained(&child)? {
                return Ok(false);
            }
        } else {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Index over the cached folders on disk. The manifest is authoritative:
/// records whose cached directory has vanished are dropped (with a warning)
/// at load time, never silently resurrected by scanning the cache area.
pub struct FolderCache {
    root: PathBuf,
    records: Vec<CachedFolderRecord>,
}

impl FolderCache {
    /// Default cache root inside the platform application-data directory.
    pub fn default_root() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|d| d.join("fusion").join("cache"))
            .ok_or_else(|| {
                FusionError::Configuration(
                    "no application data directory available on this platform".to_string(),
                )
            })
    }

    /// Open the cache rooted at `root`, creating the area if needed and
    /// loading the manifest (missing manifest means an empty cache).
    pub fn open(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(root.join(FOLDERS_DIR)).map_err(|e| FusionError::io(&root, e))?;

        let mut records = load_manifest(&root.join(MANIFEST_FILE))?;
        let before = records.len();
        records.retain(|record| {
            let present = record.cached_path.is_dir();
            if !present {
                warn!(
                    id = %record.id,
                    path = %record.cached_path.display(),
                    "dropping stale cache record: cached folder is missing"
                );
            }
            present
        });

        let cache = Self { root, records };
        if cache.records.len() != before {
            cache.flush()?;
        }
        Ok(cache)
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    fn folders_dir(&self) -> PathBuf {
        self.root.join(FOLDERS_DIR)
    }

    fn flush(&self) -> Result<()> {
        flush_manifest(&self.manifest_path(), &self.records)
    }

    /// All current records, most recently cached first.
    pub fn list(&self) -> Vec<CachedFolderRecord> {
        let mut records = self.records.clone();
        // Records are appended in caching order; reversing before the stable
        // sort keeps later insertions first among equal timestamps.
        records.reverse();
        records.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));
        records
    }

    /// Relocate a drained folder into the cache and record it.
    ///
    /// Rejects non-drained folders with a `Conflict` error; the merge engine
    /// only hands over roots it has verified, but the check is repeated here
    /// because the cache is also a public entry point.
    pub fn cache_folder(
        &mut self,
        folder: &Path,
        source_root: &Path,
    ) -> Result<CachedFolderRecord> {
        if !is_drained(folder)? {
            return Err(FusionError::Conflict(format!(
                "folder is not empty, refusing to cache it: {}",
                folder.display()
            )));
        }

        let original = folder
            .canonicalize()
            .map_err(|e| FusionError::io(folder, e))?;
        let record = CachedFolderRecord::new(
            self.records.len(),
            original.clone(),
            source_root,
            &self.folders_dir(),
        );

        move_empty_tree(&original, &record.cached_path)?;
        self.records.push(record.clone());
        self.flush()?;
        Ok(record)
    }

    /// Move a cached folder back to its original path and drop the record.
    /// The record survives a failed restore.
    pub fn restore(&mut self, id: &str) -> Result<()> {
        let record = self.find_record(id)?.clone();

        if record.original_path.exists() {
            // An empty directory that reappeared at the original path is not
            // a conflict; anything with content is.
            if !is_drained(&record.original_path)? {
                return Err(FusionError::Conflict(format!(
                    "original path exists and is not empty: {}",
                    record.original_path.display()
                )));
            }
            fs::remove_dir_all(&record.original_path)
                .map_err(|e| FusionError::io(&record.original_path, e))?;
        }

        move_empty_tree(&record.cached_path, &record.original_path)?;
        self.remove_record(id);
        self.flush()?;
        Ok(())
    }

    /// Move a cached folder to a new path and drop the record.
    pub fn restore_to(&mut self, id: &str, new_path: &Path) -> Result<()> {
        let record = self.find_record(id)?.clone();
        if new_path.exists() {
            return Err(FusionError::Conflict(format!(
                "target path already exists: {}",
                new_path.display()
            )));
        }
        move_empty_tree(&record.cached_path, new_path)?;
        self.remove_record(id);
        self.flush()?;
        Ok(())
    }

    /// Permanently remove a cached folder and its record.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let record = self.find_record(id)?.clone();
        if record.cached_path.exists() {
            fs::remove_dir_all(&record.cached_path)
                .map_err(|e| FusionError::io(&record.cached_path, e))?;
        }
        self.remove_record(id);
        self.flush()?;
        Ok(())
    }

    fn find_record(&self, id: &str) -> Result<&CachedFolderRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| FusionError::NotFound(id.to_string()))
    }

    fn remove_record(&mut self, id: &str) {
        self.records.retain(|r| r.id != id);
    }
}

/// Relocate a drained directory tree. Tries a plain rename first; across
/// devices the (file-less) skeleton is re-created and the original removed.
fn move_empty_tree(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| FusionError::io(parent, e))?;
    }
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    copy_dir_skeleton(from, to).map_err(|e| FusionError::io(from, e))?;
    fs::remove_dir_all(from).map_err(|e| FusionError::io(from, e))?;
    Ok(())
}

fn copy_dir_skeleton(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            copy_dir_skeleton(&entry.path(), &to.join(entry.file_name()))?;
        }
    }
    Ok(())
}
