//! Error types for syspoll.
//!
//! The taxonomy distinguishes two classes:
//! - Fatal errors abort the run with a non-zero exit status (missing input,
//!   sink write failures).
//! - Skippable errors cover one category or one line; they are logged as
//!   warnings and the run continues. Strict mode upgrades them to fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for syspoll operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for syspoll.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("unknown category: {name}")]
    UnknownCategory { name: String },

    // Per-line decode errors (20-29)
    #[error("malformed line: {reason}")]
    MalformedLine { reason: String },

    // Collection errors (30-39)
    #[error("collection failed for {category}: {reason}")]
    Collection { category: String, reason: String },

    // Sink errors (40-49)
    #[error("sink write failed ({sink}): {reason}")]
    SinkWrite { sink: &'static str, reason: String },

    // I/O and serialization (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by class:
    /// - 10-19: input errors
    /// - 20-29: per-line decode errors
    /// - 30-39: collection errors
    /// - 40-49: sink errors
    /// - 60-69: I/O and serialization
    pub fn code(&self) -> u32 {
        match self {
            Error::InputNotFound { .. } => 10,
            Error::UnknownCategory { .. } => 11,
            Error::MalformedLine { .. } => 20,
            Error::Collection { .. } => 30,
            Error::SinkWrite { .. } => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns whether this error aborts the run.
    ///
    /// Skippable errors (unknown category, malformed line, one category's
    /// collection failure) are reported as warnings; the remaining
    /// categories and lines still process. Everything touching input
    /// existence or sink durability is fatal.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::InputNotFound { .. } => true,
            Error::UnknownCategory { .. } => false,
            Error::MalformedLine { .. } => false,
            Error::Collection { .. } => false,
            Error::SinkWrite { .. } => true,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns the pipeline stage to name in user-facing failure messages.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::InputNotFound { .. } => "input",
            Error::UnknownCategory { .. } => "category",
            Error::MalformedLine { .. } => "decode",
            Error::Collection { .. } => "collect",
            Error::SinkWrite { .. } => "sink",
            Error::Io(_) => "io",
            Error::Json(_) => "decode",
        }
    }

    /// Shorthand for a malformed-line error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedLine {
            reason: reason.into(),
        }
    }

    /// Shorthand for a sink write failure.
    pub fn sink(sink: &'static str, reason: impl std::fmt::Display) -> Self {
        Error::SinkWrite {
            sink,
            reason: reason.to_string(),
        }
    }
}
