//! Conflict name resolution
//!
//! When a file's mirrored destination exists with different content, the
//! resolver scans `name (1).ext`, `name (2).ext`, ... for the smallest suffix
//! whose path neither exists on disk nor has been claimed earlier in the same
//! plan. If the scan encounters an existing suffixed file whose content equals
//! the source, the file is a duplicate and should be skipped, not copied again.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::compare::files_equal;
use crate::error::Result;

/// Outcome of resolving a name collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Copy under this free suffixed path.
    Renamed(PathBuf),
    /// An identical copy already exists at this path; skip the file.
    Duplicate(PathBuf),
}

/// Find a non-colliding destination for `file_name` inside `dest_dir`.
///
/// `claimed` holds every destination path already allocated by the current
/// plan; names in it are never reused, so two conflicts in one run cannot
/// resolve to the same target. Deterministic for a given starting state.
pub fn resolve_conflict(
    dest_dir: &Path,
    file_name: &str,
    source: &Path,
    claimed: &HashSet<PathBuf>,
) -> Result<Resolution> {
    let (stem, extension) = split_name(file_name);

    for count in 1.. {
        let candidate_name = match extension {
            Some(ext) => format!("{stem} ({count}).{ext}"),
            None => format!("{stem} ({count})"),
        };
        let candidate = dest_dir.join(&candidate_name);

        if candidate.exists() {
            if files_equal(source, &candidate)? {
                return Ok(Resolution::Duplicate(candidate));
            }
            continue;
        }
        if !claimed.contains(&candidate) {
            return Ok(Resolution::Renamed(candidate));
        }
    }
    unreachable!("suffix search is unbounded")
}

/// Split a file name into stem and extension. Dotfiles and extension-less
/// names keep the whole name as the stem.
fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}
