//! progdate core - program creation dates from version-control history.
//!
//! Walks a directory of numerically named program files (`00045.asm`,
//! `A000045.asm`), asks the history backend when each file was first added,
//! and writes `program id;creation date` rows to a CSV file.
//!
//! # Usage
//!
//! ```no_run
//! use progdate_core::{GitHistory, LogObserver, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::new("programs").with_output("data/dates.csv");
//! let history = GitHistory::new("programs");
//! let summary = Pipeline::new(config, history).run(&mut LogObserver)?;
//! println!("rows written: {}", summary.rows_written);
//! # Ok::<(), progdate_core::PipelineError>(())
//! ```

pub mod emitter;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod program;
pub mod progress;
pub mod scanner;

pub use emitter::CsvEmitter;
pub use error::{HistoryError, PipelineError, ProgramIdError, ResolveError, Result};
pub use history::{resolve_creation_date, GitHistory, HistoryQuery};
pub use pipeline::{Pipeline, PipelineConfig, RunSummary, SkipCounts};
pub use program::{CreationDate, CreationRecord, ProgramId, ProgramPath};
pub use progress::{LogObserver, ProgressObserver, ProgressReporter, ProgressUpdate};
pub use scanner::{scan_programs, ScanResult};
