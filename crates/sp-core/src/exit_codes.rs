//! Exit codes for the syspoll CLI.
//!
//! Exit codes communicate the outcome without output parsing and are a
//! stable contract for cron and automation. Warnings never change the
//! exit status; only fatal errors do.
//!
//! Ranges:
//! - 0: clean run (possibly with warnings)
//! - 10-19: user/environment errors (recoverable by user action)
//! - 20-29: internal and storage errors

use sp_common::Error;

/// Exit codes for syspoll operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success; warnings may have been logged.
    Clean = 0,

    /// Invalid arguments (bad category list in strict mode).
    ArgsError = 10,

    /// Required input path missing.
    InputError = 11,

    /// Input data unparseable (strict mode only).
    DataError = 12,

    /// Collection failed (strict mode only).
    CollectError = 13,

    /// Internal error.
    InternalError = 20,

    /// I/O error outside a sink.
    IoError = 21,

    /// Sink write failure; durability not guaranteed past this point.
    SinkError = 22,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a pipeline error to its exit code.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::InputNotFound { .. } => ExitCode::InputError,
            Error::UnknownCategory { .. } => ExitCode::ArgsError,
            Error::MalformedLine { .. } => ExitCode::DataError,
            Error::Collection { .. } => ExitCode::CollectError,
            Error::SinkWrite { .. } => ExitCode::SinkError,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::DataError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_stable_values() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::InputError.as_i32(), 11);
        assert_eq!(ExitCode::SinkError.as_i32(), 22);
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            ExitCode::from_error(&Error::InputNotFound {
                path: PathBuf::from("x")
            }),
            ExitCode::InputError
        );
        assert_eq!(
            ExitCode::from_error(&Error::sink("csv", "disk full")),
            ExitCode::SinkError
        );
        assert_eq!(
            ExitCode::from_error(&Error::UnknownCategory { name: "x".into() }),
            ExitCode::ArgsError
        );
    }
}
