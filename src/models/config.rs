use std::path::PathBuf;

/// How source folders are selected for a merge run.
#[derive(Debug, Clone)]
pub enum SourceSelection {
    /// Explicit ordered list of directories.
    Explicit(Vec<PathBuf>),
    /// Glob pattern expanded relative to a base directory.
    Pattern { pattern: String, base: PathBuf },
}

/// Whether merged files are copied or moved out of their source tree.
///
/// Move semantics is what makes a source root eligible for the empty-folder
/// cache once it is drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSemantics {
    Copy,
    Move,
}

/// Configuration for one merge run. Immutable once constructed; the engine
/// borrows it and never mutates it.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub destination: PathBuf,
    pub selection: SourceSelection,
    pub semantics: FileSemantics,
    pub simulate: bool,
    pub verbose: bool,
    pub include_hidden: bool,
}

impl MergeConfig {
    pub fn new(destination: PathBuf, selection: SourceSelection) -> Self {
        Self {
            destination,
            selection,
            semantics: FileSemantics::Copy,
            simulate: false,
            verbose: false,
            include_hidden: false,
        }
    }

    pub fn with_semantics(mut self, semantics: FileSemantics) -> Self {
        self.semantics = semantics;
        self
    }

    pub fn simulated(mut self) -> Self {
        self.simulate = true;
        self
    }
}
