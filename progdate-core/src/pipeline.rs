//! The creation-date batch: enumerate, resolve, emit.
//!
//! The loop is strictly sequential. A path that cannot be resolved is logged
//! and skipped; only configuration and output I/O errors end the run early.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use crate::emitter::{CsvEmitter, DEFAULT_OUTPUT_PATH};
use crate::error::{HistoryError, ResolveError, Result};
use crate::history::{resolve_creation_date, HistoryQuery};
use crate::program::ProgramPath;
use crate::progress::{ProgressObserver, ProgressReporter};
use crate::scanner::{self, DEFAULT_EXTENSION};

/// Explicit run configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the program files.
    pub root: PathBuf,
    /// Program file extension, without the dot.
    pub extension: String,
    /// CSV destination (truncated on start).
    pub output: PathBuf,
    /// Fixed progress cadence; `None` uses `max(total / 1000, 1)`.
    pub progress_interval: Option<usize>,
}

impl PipelineConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            progress_interval: None,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_progress_interval(mut self, interval: Option<usize>) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Why paths were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub invalid_program_id: usize,
    pub history_query_failed: usize,
    pub no_history: usize,
    pub invalid_timestamp: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.invalid_program_id + self.history_query_failed + self.no_history + self.invalid_timestamp
    }

    fn record(&mut self, error: &ResolveError) {
        match error {
            ResolveError::ProgramId(_) => self.invalid_program_id += 1,
            ResolveError::History(HistoryError::QueryFailed { .. }) => {
                self.history_query_failed += 1
            }
            ResolveError::History(HistoryError::NoHistory { .. }) => self.no_history += 1,
            ResolveError::InvalidTimestamp { .. } => self.invalid_timestamp += 1,
        }
    }
}

/// Reconciliation record for a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub root: String,
    pub output: String,
    pub paths_discovered: usize,
    pub rows_written: usize,
    pub skipped: SkipCounts,
    pub duration_ms: u64,
}

/// One run of the creation-date batch.
pub struct Pipeline<Q: HistoryQuery> {
    config: PipelineConfig,
    query: Q,
}

impl<Q: HistoryQuery> Pipeline<Q> {
    pub fn new(config: PipelineConfig, query: Q) -> Self {
        Self { config, query }
    }

    /// Run to completion.
    ///
    /// The root is validated and scanned before the output file is touched, so
    /// a configuration error never clobbers an existing CSV.
    pub fn run(&self, observer: &mut dyn ProgressObserver) -> Result<RunSummary> {
        let start = Instant::now();

        let scan = scanner::scan_programs(&self.config.root, &self.config.extension)?;
        let total = scan.len();
        tracing::info!(
            "Resolving creation dates for {} programs under {}",
            total,
            self.config.root.display()
        );

        let mut emitter = CsvEmitter::create(&self.config.output)?;
        let reporter = ProgressReporter::new(total, self.config.progress_interval);
        let mut skipped = SkipCounts::default();

        for (index, path) in scan.paths.iter().enumerate() {
            if let Some(update) = reporter.check(index, emitter.rows_written()) {
                observer.on_progress(&update);
            }

            let resolved = ProgramPath::parse(path.as_str())
                .map_err(ResolveError::from)
                .and_then(|program| resolve_creation_date(&self.query, &program));

            match resolved {
                Ok(record) => {
                    tracing::debug!(
                        "{} -> {};{}",
                        path,
                        record.program_id,
                        record.creation_date
                    );
                    emitter.write_record(&record)?;
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path, e);
                    skipped.record(&e);
                }
            }
        }

        let rows_written = emitter.rows_written();
        tracing::info!(
            "Wrote {} of {} programs to {}",
            rows_written,
            total,
            self.config.output.display()
        );

        Ok(RunSummary {
            root: self.config.root.display().to_string(),
            output: self.config.output.display().to_string(),
            paths_discovered: total,
            rows_written,
            skipped,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
