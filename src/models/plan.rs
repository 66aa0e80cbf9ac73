use std::fmt;
use std::path::{Path, PathBuf};

/// Why a file was planned as a skip rather than a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The mirrored destination file has identical content.
    Identical,
    /// An identical copy already exists under a different (suffixed) name.
    DuplicateOf(PathBuf),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Identical => write!(f, "identical file at destination"),
            SkipReason::DuplicateOf(path) => {
                write!(f, "identical copy present as {}", path.display())
            }
        }
    }
}

/// One unit of merge work, computed by the planner and applied exactly once
/// by the executor. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    CreateDirectory {
        dest: PathBuf,
    },
    CopyFile {
        source: PathBuf,
        dest: PathBuf,
    },
    /// Same name as an existing destination file but different content; copy
    /// under a suffixed name that was free at planning time.
    RenameAndCopy {
        source: PathBuf,
        dest: PathBuf,
    },
    Skip {
        source: PathBuf,
        reason: SkipReason,
    },
}

impl PlannedAction {
    /// Destination path this action writes, if any.
    pub fn dest(&self) -> Option<&Path> {
        match self {
            PlannedAction::CreateDirectory { dest }
            | PlannedAction::CopyFile { dest, .. }
            | PlannedAction::RenameAndCopy { dest, .. } => Some(dest),
            PlannedAction::Skip { .. } => None,
        }
    }

    /// True for actions that account for one visited source file.
    pub fn is_file_action(&self) -> bool {
        !matches!(self, PlannedAction::CreateDirectory { .. })
    }
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannedAction::CreateDirectory { dest } => {
                write!(f, "Create directory: {}", dest.display())
            }
            PlannedAction::CopyFile { source, dest } => {
                write!(f, "Copy: {} -> {}", source.display(), dest.display())
            }
            PlannedAction::RenameAndCopy { source, dest } => {
                write!(f, "Rename: {} -> {}", source.display(), dest.display())
            }
            PlannedAction::Skip { source, reason } => {
                write!(f, "Skip: {} ({reason})", source.display())
            }
        }
    }
}

/// Ordered action sequence for one source root. Directories always precede the
/// files they contain, so creation happens before any copy into them.
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub actions: Vec<PlannedAction>,
    /// Entries that could not be examined during planning (unreadable file,
    /// vanished mid-walk). Seeded into the error count at execution time so
    /// the accounting stays conserved.
    pub planning_errors: Vec<String>,
}

impl MergePlan {
    pub fn new(source_root: PathBuf, dest_root: PathBuf) -> Self {
        Self {
            source_root,
            dest_root,
            actions: Vec::new(),
            planning_errors: Vec::new(),
        }
    }

    /// Number of source files this plan accounts for, including entries that
    /// failed during planning.
    pub fn files_visited(&self) -> usize {
        self.actions.iter().filter(|a| a.is_file_action()).count() + self.planning_errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.planning_errors.is_empty()
    }
}
