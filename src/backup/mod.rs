//! Merge journals and undo
//!
//! A real-mode merge under move semantics journals every file it moved or
//! renamed. The journal is saved as a small JSON file so a later invocation
//! can undo the merge: operations are replayed in reverse, moving each file
//! back to its source path. Undo is best-effort with full accounting, the
//! same partial-failure policy the executor follows.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::report::AppliedOperation;

const BACKUP_PREFIX: &str = "fusion-backup-";

/// One saved merge journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupJournal {
    pub created_at: DateTime<Utc>,
    pub destination: PathBuf,
    pub source_roots: Vec<PathBuf>,
    pub operations: Vec<AppliedOperation>,
}

/// Result counters for a journal restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreSummary {
    pub restored: u64,
    pub errors: u64,
}

impl BackupJournal {
    pub fn new(
        destination: PathBuf,
        source_roots: Vec<PathBuf>,
        operations: Vec<AppliedOperation>,
    ) -> Self {
        Self {
            created_at: Utc::now(),
            destination,
            source_roots,
            operations,
        }
    }

    /// Default backup directory inside the platform application-data directory.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("fusion").join("backups"))
    }

    /// Write the journal to `dir`, returning the file path. Journals with no
    /// operations are not worth keeping and yield `None`.
    pub fn save(&self, dir: &Path) -> Result<Option<PathBuf>> {
        if self.operations.is_empty() {
            return Ok(None);
        }
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create backup directory: {}", dir.display()))?;

        let name = format!(
            "{BACKUP_PREFIX}{}.json",
            self.created_at.format("%Y%m%d_%H%M%S")
        );
        let path = dir.join(name);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize backup")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write backup file: {}", path.display()))?;
        Ok(Some(path))
    }

    /// Undo the journalled merge by replaying operations in reverse.
    ///
    /// Each moved or renamed file is moved from its destination back to its
    /// source path, re-creating parent directories as needed. A missing
    /// destination is counted as an error and the replay continues. Simulate
    /// mode counts without touching the filesystem.
    pub fn restore(&self, simulate: bool) -> RestoreSummary {
        let mut summary = RestoreSummary::default();

        for op in self.operations.iter().rev() {
            let (source, dest) = match op {
                AppliedOperation::Moved { source, dest }
                | AppliedOperation::Renamed { source, dest } => (source, dest),
            };

            if !dest.exists() {
                warn!(path = %dest.display(), "cannot undo: merged file no longer exists");
                summary.errors += 1;
                continue;
            }
            if simulate {
                summary.restored += 1;
                continue;
            }

            let result = source
                .parent()
                .map(fs::create_dir_all)
                .unwrap_or(Ok(()))
                .and_then(|()| fs::rename(dest, source));
            match result {
                Ok(()) => summary.restored += 1,
                Err(e) => {
                    warn!(path = %dest.display(), "undo failed: {e}");
                    summary.errors += 1;
                }
            }
        }
        summary
    }
}

/// Load a journal from a backup file.
pub fn read_backup(path: &Path) -> Result<BackupJournal> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read backup file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse backup file: {}", path.display()))
}

/// List saved journals in `dir`, newest first. Unparseable files are skipped
/// with a warning rather than failing the listing.
pub fn list_backups(dir: &Path) -> Result<Vec<(PathBuf, BackupJournal)>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read backup directory: {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        let is_backup = name
            .as_deref()
            .is_some_and(|n| n.starts_with(BACKUP_PREFIX) && n.ends_with(".json"));
        if !is_backup {
            continue;
        }
        match read_backup(&path) {
            Ok(journal) => backups.push((path, journal)),
            Err(e) => warn!(path = %path.display(), "skipping unreadable backup: {e}"),
        }
    }

    backups.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
    Ok(backups)
}

/// Delete a backup file.
pub fn delete_backup(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .with_context(|| format!("Failed to delete backup file: {}", path.display()))
}
