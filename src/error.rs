//! Error types for mirror post-processing.
//!
//! Only whole-run failures surface as errors; a single unresolvable
//! reference inside a document is logged and skipped instead (see the
//! rewriter), and a single document's failure is contained at the pipeline
//! boundary.

use std::io;
use std::path::PathBuf;

/// Error type for mirror processing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured mirror root does not exist or is not a directory.
    #[error("mirror root is not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// Reading a document from disk failed.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// The document that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Writing a processed document back to disk failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// The document that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Walking the mirror tree failed.
    #[error("failed to walk mirror tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// The pre-run backup could not be created.
    #[error("failed to back up mirror to {}: {source}", .path.display())]
    Backup {
        /// Backup destination.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Result type alias for mirror processing operations.
pub type Result<T> = std::result::Result<T, Error>;
