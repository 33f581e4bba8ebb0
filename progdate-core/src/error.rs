//! Error types for progdate-core.
//!
//! Per-path failures (`ProgramIdError`, `HistoryError`, `ResolveError`) are
//! recoverable and only ever cause a path to be skipped. `PipelineError` is
//! fatal and aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fatal pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// A file name that does not encode a program id.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramIdError {
    /// The path has no file name component.
    #[error("path has no file name: {path}")]
    MissingFileName {
        /// Offending path.
        path: String,
    },

    /// The file stem is not a run of digits (optionally `A`-prefixed).
    #[error("file name does not match the numeric id pattern: {path}")]
    NotNumeric {
        /// Offending path.
        path: String,
    },

    /// The digits are all zero.
    #[error("program id must be positive: {path}")]
    Zero {
        /// Offending path.
        path: String,
    },

    /// The id does not fit in a `u64`.
    #[error("program id is out of range: {path}")]
    OutOfRange {
        /// Offending path.
        path: String,
    },
}

/// Failure of the version-control history query.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The history tool could not be started or exited with a failure status.
    #[error("history query failed for {path}: {message}")]
    QueryFailed {
        /// Path that was queried.
        path: String,
        /// Exit status and stderr, or the spawn error.
        message: String,
    },

    /// The query succeeded but no commit ever added the path.
    #[error("no commit adds {path}")]
    NoHistory {
        /// Path that was queried.
        path: String,
    },
}

/// Failure to turn a program path into a creation record.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    ProgramId(#[from] ProgramIdError),

    #[error(transparent)]
    History(#[from] HistoryError),

    /// The history tool returned something that is not an ISO-8601 timestamp.
    #[error("unparseable timestamp {raw:?} for {path}: {source}")]
    InvalidTimestamp {
        path: String,
        raw: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Fatal errors that abort a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The configured root directory does not exist.
    #[error("root directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The configured root exists but is not a directory.
    #[error("root path is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    /// The directory walk could not be started.
    #[error("failed to scan {}: {message}", .root.display())]
    Scan {
        /// Root that was being scanned.
        root: PathBuf,
        /// Underlying walker error.
        message: String,
    },

    /// Output file could not be created or written.
    #[error("output error on {}: {source}", .path.display())]
    Io {
        /// Output file path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProgramIdError::NotNumeric {
            path: "bogus.asm".to_string(),
        };
        assert!(err.to_string().contains("bogus.asm"));

        let err = PipelineError::RootNotFound(PathBuf::from("/no/such/dir"));
        assert!(err.to_string().contains("/no/such/dir"));

        let err = HistoryError::QueryFailed {
            path: "00010.asm".to_string(),
            message: "exit status: 128".to_string(),
        };
        let err: ResolveError = err.into();
        assert!(err.to_string().contains("00010.asm"));
        assert!(err.to_string().contains("128"));
    }
}
