//! Merge planning
//!
//! Walks one source tree depth-first against the (possibly partially
//! populated) destination tree and produces an ordered action sequence.
//! Directories are visited before their contents so every `CreateDirectory`
//! precedes the file actions targeting it. The planner never mutates the
//! filesystem; planning twice over an unchanged tree yields the same plan.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::compare::files_equal;
use super::is_hidden;
use super::naming::{resolve_conflict, Resolution};
use crate::error::{FusionError, Result};
use crate::models::{MergeConfig, MergePlan, PlannedAction, SkipReason};

/// Plan the merge of `source_root` into `dest_root`.
///
/// Fails only when the source root itself cannot be read; per-entry failures
/// (file vanished mid-walk, unreadable content during comparison) are recorded
/// in the plan and the walk continues.
pub fn plan(source_root: &Path, dest_root: &Path, config: &MergeConfig) -> Result<MergePlan> {
    if !source_root.is_dir() {
        return Err(FusionError::Configuration(format!(
            "source folder does not exist or is not a directory: {}",
            source_root.display()
        )));
    }

    let mut plan = MergePlan::new(source_root.to_path_buf(), dest_root.to_path_buf());
    // Every destination path allocated by this plan, so no two actions can
    // write the same target.
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    walk(source_root, dest_root, config, &mut plan, &mut claimed)
        .map_err(|e| FusionError::io(source_root, e))?;

    Ok(plan)
}

fn walk(
    source_dir: &Path,
    dest_dir: &Path,
    config: &MergeConfig,
    plan: &mut MergePlan,
    claimed: &mut HashSet<PathBuf>,
) -> std::io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(source_dir)?.collect::<std::io::Result<_>>()?;
    // Deterministic walk order keeps planning idempotent.
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let source_path = entry.path();

        if is_hidden(&name) && !config.include_hidden {
            debug!(path = %source_path.display(), "excluding hidden entry");
            continue;
        }

        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                plan.planning_errors
                    .push(format!("{}: {e}", source_path.display()));
                continue;
            }
        };

        let mirror = dest_dir.join(&name);
        if file_type.is_dir() {
            if !mirror.is_dir() && claimed.insert(mirror.clone()) {
                plan.actions.push(PlannedAction::CreateDirectory {
                    dest: mirror.clone(),
                });
            }
            // Merge-in-place: recurse whether or not the counterpart exists.
            if let Err(e) = walk(&source_path, &mirror, config, plan, claimed) {
                plan.planning_errors
                    .push(format!("{}: {e}", source_path.display()));
            }
        } else {
            plan_file(&source_path, &mirror, dest_dir, &name, plan, claimed);
        }
    }

    Ok(())
}

fn plan_file(
    source_path: &Path,
    mirror: &Path,
    dest_dir: &Path,
    name: &str,
    plan: &mut MergePlan,
    claimed: &mut HashSet<PathBuf>,
) {
    // The mirrored path counts as a conflict when it exists on disk or when
    // an earlier action in this plan already claimed it.
    let conflicted = mirror.exists() || claimed.contains(mirror);

    if !conflicted {
        claimed.insert(mirror.to_path_buf());
        plan.actions.push(PlannedAction::CopyFile {
            source: source_path.to_path_buf(),
            dest: mirror.to_path_buf(),
        });
        return;
    }

    if mirror.exists() {
        match files_equal(source_path, mirror) {
            Ok(true) => {
                plan.actions.push(PlannedAction::Skip {
                    source: source_path.to_path_buf(),
                    reason: SkipReason::Identical,
                });
                return;
            }
            Ok(false) => {}
            Err(e) => {
                plan.planning_errors.push(e.to_string());
                return;
            }
        }
    }

    match resolve_conflict(dest_dir, name, source_path, claimed) {
        Ok(Resolution::Renamed(dest)) => {
            claimed.insert(dest.clone());
            plan.actions.push(PlannedAction::RenameAndCopy {
                source: source_path.to_path_buf(),
                dest,
            });
        }
        Ok(Resolution::Duplicate(existing)) => {
            plan.actions.push(PlannedAction::Skip {
                source: source_path.to_path_buf(),
                reason: SkipReason::DuplicateOf(existing),
            });
        }
        Err(e) => plan.planning_errors.push(e.to_string()),
    }
}
