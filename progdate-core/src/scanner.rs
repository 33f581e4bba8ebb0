//! Program file discovery using the `ignore` crate.
//!
//! Every file with the program extension counts, so gitignore rules and the
//! hidden-file filter are switched off. Only the `.git` directory itself is
//! pruned. Results are sorted so runs are reproducible.

use ignore::WalkBuilder;
use serde::Serialize;
use std::path::{Component, Path};
use std::time::Instant;

use crate::error::{PipelineError, Result};

/// Default program file extension.
pub const DEFAULT_EXTENSION: &str = "asm";

/// Result of scanning a program root.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ScanResult {
    /// Relative, `/`-separated paths in lexicographic order.
    pub paths: Vec<String>,

    /// Entries the walker could not read, or whose path is not UTF-8.
    pub error_count: usize,
}

impl ScanResult {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Fail fast unless `root` is an existing directory.
pub fn validate_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(PipelineError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(PipelineError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Normalize a user-supplied extension (`".ASM"` -> `"asm"`).
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

/// Render a path relative to the root with `/` separators.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    // One non UTF-8 component rejects the whole path
    let parts = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<&str>>>()?;
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Recursively find all files under `root` with the given extension.
///
/// An empty result is not an error.
pub fn scan_programs(root: &Path, extension: &str) -> Result<ScanResult> {
    let start = Instant::now();
    validate_root(root)?;

    std::fs::read_dir(root).map_err(|e| PipelineError::Scan {
        root: root.to_path_buf(),
        message: e.to_string(),
    })?;

    let wanted = normalize_extension(extension);

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut paths = Vec::new();
    let mut error_count = 0;

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                error_count += 1;
                continue;
            }
        };

        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase() == wanted)
            .unwrap_or(false);
        if !matches {
            continue;
        }

        match relative_path(root, entry.path()) {
            Some(path) => paths.push(path),
            None => {
                tracing::warn!("Skipping non UTF-8 path: {}", entry.path().display());
                error_count += 1;
            }
        }
    }

    paths.sort();

    tracing::debug!(
        "Found {} program files under {} in {:.1}ms",
        paths.len(),
        root.display(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(ScanResult { paths, error_count })
}
