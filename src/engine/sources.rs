//! Source folder resolution
//!
//! Turns the configured selection (explicit list or glob pattern) into an
//! ordered sequence of absolute, existing directories, with the destination
//! and duplicates removed. Pure lookup; no filesystem mutation.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FusionError, Result};
use crate::models::{MergeConfig, SourceSelection};

/// Resolve the configured sources into concrete merge roots.
///
/// Explicitly named paths must exist and be directories; a pattern that
/// matches nothing, or a selection that leaves no sources after filtering,
/// is a configuration error. A destination equal to or nested inside a
/// source root is rejected before any planning begins.
pub fn resolve_sources(config: &MergeConfig) -> Result<Vec<PathBuf>> {
    let destination = absolutize(&config.destination);

    let candidates = match &config.selection {
        SourceSelection::Explicit(paths) => {
            if paths.is_empty() {
                return Err(FusionError::Configuration(
                    "no source folders given".to_string(),
                ));
            }
            for path in paths {
                if !path.is_dir() {
                    return Err(FusionError::Configuration(format!(
                        "source folder does not exist or is not a directory: {}",
                        path.display()
                    )));
                }
            }
            paths.clone()
        }
        SourceSelection::Pattern { pattern, base } => {
            let full_pattern = base.join(pattern);
            let matches = glob::glob(&full_pattern.to_string_lossy()).map_err(|e| {
                FusionError::Configuration(format!("invalid source pattern `{pattern}`: {e}"))
            })?;
            let mut dirs = Vec::new();
            for entry in matches {
                match entry {
                    Ok(path) if path.is_dir() => dirs.push(path),
                    Ok(path) => debug!(path = %path.display(), "pattern match is not a directory"),
                    Err(e) => debug!("unreadable pattern match: {e}"),
                }
            }
            if dirs.is_empty() {
                return Err(FusionError::Configuration(format!(
                    "source pattern `{pattern}` matched no directories"
                )));
            }
            dirs
        }
    };

    let mut resolved: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        let absolute = absolutize(&candidate);
        if absolute == destination {
            debug!(path = %absolute.display(), "excluding destination from sources");
            continue;
        }
        if destination.starts_with(&absolute) {
            return Err(FusionError::Configuration(format!(
                "destination {} lies inside source folder {}",
                destination.display(),
                absolute.display()
            )));
        }
        if !resolved.contains(&absolute) {
            resolved.push(absolute);
        }
    }

    if resolved.is_empty() {
        return Err(FusionError::Configuration(
            "no usable source folders after excluding the destination".to_string(),
        ));
    }

    Ok(resolved)
}

/// Canonicalize when the path exists, otherwise anchor it to the current
/// directory. The destination may legitimately not exist yet.
fn absolutize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
