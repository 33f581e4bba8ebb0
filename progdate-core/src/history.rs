//! Creation-date resolution from version-control history.
//!
//! The history backend sits behind [`HistoryQuery`] so the pipeline can be
//! driven by git in production and by an in-memory fake in tests.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{HistoryError, ResolveError};
use crate::program::{CreationDate, CreationRecord, ProgramPath};

/// Default history tool binary.
pub const DEFAULT_GIT: &str = "git";

/// Source of "earliest addition" timestamps.
pub trait HistoryQuery {
    /// Return the ISO-8601 author timestamp of the earliest commit that added
    /// `path` (relative to the repository root), following renames.
    fn earliest_addition(&self, path: &str) -> Result<String, HistoryError>;
}

impl<T: HistoryQuery + ?Sized> HistoryQuery for &T {
    fn earliest_addition(&self, path: &str) -> Result<String, HistoryError> {
        (**self).earliest_addition(path)
    }
}

/// Git-backed history, one `git log` process per query.
#[derive(Debug, Clone)]
pub struct GitHistory {
    repo_dir: PathBuf,
    git: String,
}

impl GitHistory {
    /// Query history for paths relative to `repo_dir`.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            git: DEFAULT_GIT.to_string(),
        }
    }

    /// Use a different git binary.
    pub fn with_git(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }
}

/// Pick the earliest timestamp out of `git log` output (newest first).
fn last_timestamp_line(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
}

impl HistoryQuery for GitHistory {
    fn earliest_addition(&self, path: &str) -> Result<String, HistoryError> {
        // Format: %aI = strict ISO-8601 author date
        let output = Command::new(&self.git)
            .current_dir(&self.repo_dir)
            .args([
                "log",
                "--follow",
                "--diff-filter=A",
                "--format=%aI",
                "--",
                path,
            ])
            .output()
            .map_err(|e| HistoryError::QueryFailed {
                path: path.to_string(),
                message: format!("failed to run {}: {}", self.git, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HistoryError::QueryFailed {
                path: path.to_string(),
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        last_timestamp_line(&stdout)
            .map(str::to_string)
            .ok_or_else(|| HistoryError::NoHistory {
                path: path.to_string(),
            })
    }
}

/// Resolve one program into its creation record.
pub fn resolve_creation_date<Q: HistoryQuery + ?Sized>(
    query: &Q,
    program: &ProgramPath,
) -> Result<CreationRecord, ResolveError> {
    let raw = query.earliest_addition(&program.path)?;
    let creation_date =
        CreationDate::from_timestamp(&raw).map_err(|source| ResolveError::InvalidTimestamp {
            path: program.path.clone(),
            raw: raw.clone(),
            source,
        })?;
    Ok(CreationRecord {
        program_id: program.id,
        creation_date,
    })
}
