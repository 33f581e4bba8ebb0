//! Program identities and creation records.
//!
//! Program files are named by their numeric id, e.g. `00045.asm`. OEIS-style
//! names with a leading `A` (`A000045.asm`) are accepted as well. Leading zeros
//! are not significant.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

use crate::error::ProgramIdError;

static PROGRAM_STEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^A?([0-9]+)$").expect("valid program stem regex"));

/// Positive integer identifier encoded in a program file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProgramId(u64);

impl ProgramId {
    /// Parse the id from the file name of `path`.
    pub fn from_path(path: &str) -> Result<Self, ProgramIdError> {
        let stem = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ProgramIdError::MissingFileName {
                path: path.to_string(),
            })?;

        let digits = PROGRAM_STEM
            .captures(stem)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| ProgramIdError::NotNumeric {
                path: path.to_string(),
            })?
            .as_str();

        let value: u64 = digits.parse().map_err(|_| ProgramIdError::OutOfRange {
            path: path.to_string(),
        })?;

        if value == 0 {
            return Err(ProgramIdError::Zero {
                path: path.to_string(),
            });
        }

        Ok(Self(value))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A discovered program file, relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramPath {
    /// Relative path with `/` separators.
    pub path: String,
    pub id: ProgramId,
}

impl ProgramPath {
    pub fn parse(path: impl Into<String>) -> Result<Self, ProgramIdError> {
        let path = path.into();
        let id = ProgramId::from_path(&path)?;
        Ok(Self { path, id })
    }
}

/// Calendar date of the earliest addition, rendered as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CreationDate(NaiveDate);

impl CreationDate {
    /// Parse an ISO-8601 timestamp and keep only the date.
    ///
    /// The date is taken in the timestamp's own offset, so
    /// `1984-12-30T23:30:00-05:00` stays on the 30th.
    pub fn from_timestamp(raw: &str) -> Result<Self, chrono::ParseError> {
        let timestamp = DateTime::parse_from_rfc3339(raw.trim())?;
        Ok(Self(timestamp.date_naive()))
    }

}

impl fmt::Display for CreationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl Serialize for CreationDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One resolved program: written exactly once to the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreationRecord {
    pub program_id: ProgramId,
    pub creation_date: CreationDate,
}
