use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Counters and logs accumulated while applying a plan. Mutated incrementally
/// by the executor, read-only once returned.
#[derive(Debug, Clone, Default)]
pub struct MergeStats {
    pub files_copied: u64,
    pub files_skipped: u64,
    pub files_renamed: u64,
    pub dirs_created: u64,
    pub bytes_copied: u64,
    pub errors: u64,
    /// One entry per recorded error, in occurrence order.
    pub error_log: Vec<String>,
    /// Human-readable action log, populated when the run is verbose.
    pub log: Vec<String>,
}

impl MergeStats {
    pub fn record_error(&mut self, message: String) {
        self.errors += 1;
        self.error_log.push(message);
    }

    /// Total source files accounted for by these stats.
    pub fn files_visited(&self) -> u64 {
        self.files_copied + self.files_skipped + self.files_renamed + self.errors
    }

    /// Fold another root's statistics into this run total.
    pub fn absorb(&mut self, other: MergeStats) {
        self.files_copied += other.files_copied;
        self.files_skipped += other.files_skipped;
        self.files_renamed += other.files_renamed;
        self.dirs_created += other.dirs_created;
        self.bytes_copied += other.bytes_copied;
        self.errors += other.errors;
        self.error_log.extend(other.error_log);
        self.log.extend(other.log);
    }
}

/// How a run ended, from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Clean,
    WithErrors(u64),
    /// The cancellation flag fired between actions.
    Cancelled { applied: usize, planned: usize },
}

impl RunOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled { .. })
    }
}

/// A filesystem mutation that actually happened, journalled so a backup can
/// undo it later. Skips are not recorded; there is nothing to reverse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AppliedOperation {
    Moved { source: PathBuf, dest: PathBuf },
    Renamed { source: PathBuf, dest: PathBuf },
}

/// Result of applying one plan: statistics, outcome, and the journal of
/// reversible operations performed.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub stats: MergeStats,
    pub outcome: RunOutcome,
    pub operations: Vec<AppliedOperation>,
}

impl MergeReport {
    /// Fold a per-root report into a run-wide one. A cancelled root marks the
    /// whole run cancelled; otherwise errors dominate a clean outcome.
    pub fn absorb(&mut self, other: MergeReport) {
        self.stats.absorb(other.stats);
        self.operations.extend(other.operations);
        if !self.outcome.is_cancelled() {
            self.outcome = match other.outcome {
                RunOutcome::Clean if self.stats.errors > 0 => {
                    RunOutcome::WithErrors(self.stats.errors)
                }
                RunOutcome::WithErrors(_) => RunOutcome::WithErrors(self.stats.errors),
                outcome => outcome,
            };
        }
    }

    pub fn empty() -> Self {
        Self {
            stats: MergeStats::default(),
            outcome: RunOutcome::Clean,
            operations: Vec::new(),
        }
    }
}
