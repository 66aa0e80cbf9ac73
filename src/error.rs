//! Engine error types
//!
//! Configuration problems abort a run before any planning happens; everything
//! else is accumulated into the run statistics by the caller rather than raised.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FusionError {
    /// Bad or missing source/destination, detected before any I/O.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A per-file or per-directory operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cache restore target already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No cached folder matches the given id.
    #[error("no cached folder with id `{0}`")]
    NotFound(String),
}

impl FusionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FusionError>;
