//! Liveness reporting for long batches.
//!
//! Purely observational: nothing here influences what gets written.

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Reports per thousand paths when no interval is configured.
const REPORTS_PER_BATCH: usize = 1000;

/// Default cadence: `max(total / 1000, 1)` with integer division.
pub fn default_interval(total: usize) -> usize {
    (total / REPORTS_PER_BATCH).max(1)
}

/// Snapshot of the scan loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
    /// 0-based index of the path about to be processed.
    pub index: usize,
    pub total: usize,
    pub rows_written: usize,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl ProgressUpdate {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.index as f64) * 100.0 / (self.total as f64)
    }
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "progress: {}/{} ({:.2}%) rows: {} elapsed: {:.3}s",
            self.index,
            self.total,
            self.percent(),
            self.rows_written,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Receives progress snapshots.
pub trait ProgressObserver {
    fn on_progress(&mut self, update: &ProgressUpdate);
}

impl<F: FnMut(&ProgressUpdate)> ProgressObserver for F {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        self(update)
    }
}

/// Forwards progress lines to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        tracing::info!("{}", update);
    }
}

/// Decides when to emit a [`ProgressUpdate`].
#[derive(Debug)]
pub struct ProgressReporter {
    total: usize,
    interval: usize,
    started: Instant,
}

impl ProgressReporter {
    /// `interval` of `None` or `Some(0)` falls back to [`default_interval`].
    pub fn new(total: usize, interval: Option<usize>) -> Self {
        let interval = match interval {
            Some(n) if n > 0 => n,
            _ => default_interval(total),
        };
        Self {
            total,
            interval,
            started: Instant::now(),
        }
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Snapshot for `index`, if it falls on the reporting cadence.
    pub fn check(&self, index: usize, rows_written: usize) -> Option<ProgressUpdate> {
        if index % self.interval != 0 {
            return None;
        }
        Some(ProgressUpdate {
            index,
            total: self.total,
            rows_written,
            elapsed: self.elapsed(),
        })
    }
}
