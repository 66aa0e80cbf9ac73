use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One relocated empty source folder, as persisted in the cache manifest.
///
/// The id is opaque to callers but time/ordinal based, so listing order and
/// uniqueness survive a manifest reload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedFolderRecord {
    pub id: String,
    /// Final path component of the original folder.
    pub name: String,
    pub original_path: PathBuf,
    pub cached_path: PathBuf,
    /// Source root the folder belonged to when it was drained.
    pub source_root: PathBuf,
    pub cached_at: DateTime<Utc>,
}

impl CachedFolderRecord {
    pub fn new(
        ordinal: usize,
        original_path: PathBuf,
        source_root: &Path,
        folders_dir: &Path,
    ) -> Self {
        let now = Utc::now();
        let name = original_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "folder".to_string());
        let id = format!("{name}-{}-{ordinal}", now.format("%Y%m%d%H%M%S"));
        let cached_path = folders_dir.join(&id);

        Self {
            id,
            name,
            original_path,
            cached_path,
            source_root: source_root.to_path_buf(),
            cached_at: now,
        }
    }
}
