//! Error types for archive operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or writing an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Source directory does not exist or is not a directory
    #[error("source is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Archive has no content to write
    #[error("archive has no content to write")]
    EmptyArchive,

    /// Target exists and no-clobber mode refuses to replace it
    #[error("refusing to clobber existing bundle: {0}")]
    WouldClobber(PathBuf),
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
