//! Semicolon-separated CSV output.
//!
//! Every row is flushed as soon as it is written, so an interrupted run still
//! leaves a parseable file containing everything resolved so far.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::program::CreationRecord;

/// Default output location, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "data/program_creation_dates.csv";

/// Field separator.
pub const SEPARATOR: char = ';';

/// Fixed header row.
pub const HEADER: [&str; 2] = ["program id", "creation date"];

/// Quote a field if it contains the separator, a quote or a line break.
///
/// Existing quotes are doubled.
pub fn escape_field(s: &str) -> String {
    if s.contains(SEPARATOR) || s.contains('\n') || s.contains('\r') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Row writer that owns the output handle for the whole run.
pub struct CsvEmitter<W: Write> {
    writer: W,
    path: PathBuf,
    rows_written: usize,
}

impl CsvEmitter<BufWriter<File>> {
    /// Create (or truncate) `path` and write the header.
    ///
    /// Missing parent directories are created.
    pub fn create(path: &Path) -> Result<Self> {
        let io_err = |source: io::Error| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = File::create(path).map_err(io_err)?;
        Self::new(BufWriter::new(file), path)
    }
}

impl<W: Write> CsvEmitter<W> {
    /// Wrap an arbitrary writer. `path` is only used in error messages.
    pub fn new(writer: W, path: impl Into<PathBuf>) -> Result<Self> {
        let mut emitter = Self {
            writer,
            path: path.into(),
            rows_written: 0,
        };
        emitter.write_fields(&HEADER)?;
        Ok(emitter)
    }

    fn write_fields(&mut self, fields: &[&str]) -> Result<()> {
        let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        let sep = SEPARATOR.to_string();
        writeln!(self.writer, "{}", line.join(&sep))
            .and_then(|_| self.writer.flush())
            .map_err(|source| PipelineError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Append one record and flush it.
    pub fn write_record(&mut self, record: &CreationRecord) -> Result<()> {
        let id = record.program_id.to_string();
        let date = record.creation_date.to_string();
        self.write_fields(&[id.as_str(), date.as_str()])?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
