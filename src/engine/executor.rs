//! Plan execution
//!
//! Applies a plan in order, mutating the filesystem in real mode and only the
//! statistics in simulate mode. A single action failure is recorded and the
//! run continues; cancellation is checked between actions, never mid-copy.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::models::report::AppliedOperation;
use crate::models::{
    FileSemantics, MergeConfig, MergePlan, MergeReport, MergeStats, PlannedAction, RunOutcome,
};

pub struct Executor {
    cancel: Arc<AtomicBool>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    pub fn new() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned cancellation flag (e.g. set from a Ctrl-C
    /// handler). The flag is read between actions only.
    pub fn with_cancel_flag(cancel: Arc<AtomicBool>) -> Self {
        Self { cancel }
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Apply `plan` under `config`, returning statistics for this source root.
    ///
    /// Never fails as a whole: per-action errors are accumulated into the
    /// statistics and the next action is attempted. Errors recorded during
    /// planning are carried into the error count up front so the conservation
    /// law (`copied + skipped + renamed + errors == files visited`) holds.
    pub fn apply(&self, plan: &MergePlan, config: &MergeConfig) -> MergeReport {
        let mut stats = MergeStats::default();
        let mut operations = Vec::new();

        for message in &plan.planning_errors {
            stats.record_error(message.clone());
        }

        let mut applied = 0;
        let mut cancelled = false;
        for action in &plan.actions {
            if self.cancel.load(Ordering::SeqCst) {
                cancelled = true;
                break;
            }
            self.apply_action(action, config, &mut stats, &mut operations);
            applied += 1;
        }

        let outcome = if cancelled {
            RunOutcome::Cancelled {
                applied,
                planned: plan.actions.len(),
            }
        } else if stats.errors > 0 {
            RunOutcome::WithErrors(stats.errors)
        } else {
            RunOutcome::Clean
        };

        MergeReport {
            stats,
            outcome,
            operations,
        }
    }

    fn apply_action(
        &self,
        action: &PlannedAction,
        config: &MergeConfig,
        stats: &mut MergeStats,
        operations: &mut Vec<AppliedOperation>,
    ) {
        debug!(%action, simulate = config.simulate, "applying");
        if config.verbose {
            let prefix = if config.simulate { "[simulate] " } else { "" };
            stats.log.push(format!("{prefix}{action}"));
        }

        match action {
            PlannedAction::CreateDirectory { dest } => {
                if config.simulate {
                    stats.dirs_created += 1;
                    return;
                }
                match fs::create_dir_all(dest) {
                    Ok(()) => stats.dirs_created += 1,
                    Err(e) => stats.record_error(format!("{}: {e}", dest.display())),
                }
            }
            PlannedAction::CopyFile { source, dest }
            | PlannedAction::RenameAndCopy { source, dest } => {
                let renamed = matches!(action, PlannedAction::RenameAndCopy { .. });
                if config.simulate {
                    stats.bytes_copied += source.metadata().map(|m| m.len()).unwrap_or(0);
                    if renamed {
                        stats.files_renamed += 1;
                    } else {
                        stats.files_copied += 1;
                    }
                    return;
                }
                match transfer_file(source, dest, config.semantics) {
                    Ok(bytes) => {
                        stats.bytes_copied += bytes;
                        if renamed {
                            stats.files_renamed += 1;
                        } else {
                            stats.files_copied += 1;
                        }
                        if config.semantics == FileSemantics::Move {
                            operations.push(if renamed {
                                AppliedOperation::Renamed {
                                    source: source.clone(),
                                    dest: dest.clone(),
                                }
                            } else {
                                AppliedOperation::Moved {
                                    source: source.clone(),
                                    dest: dest.clone(),
                                }
                            });
                        }
                    }
                    Err(e) => stats.record_error(format!("{}: {e}", source.display())),
                }
            }
            PlannedAction::Skip { .. } => stats.files_skipped += 1,
        }
    }
}

/// Copy file bytes and modification time; under move semantics, remove the
/// source afterwards. Returns the number of bytes transferred.
fn transfer_file(
    source: &Path,
    dest: &Path,
    semantics: FileSemantics,
) -> std::io::Result<u64> {
    let bytes = fs::copy(source, dest)?;

    // Preserve the source modification time on the copy. fs::copy carries
    // permissions but not timestamps.
    let modified = source.metadata()?.modified()?;
    let dest_file = fs::File::options().write(true).open(dest)?;
    dest_file.set_modified(modified)?;

    if semantics == FileSemantics::Move {
        fs::remove_file(source)?;
    }
    Ok(bytes)
}
