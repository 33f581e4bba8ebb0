//! progdate configuration loading from `.progdaterc.toml`.
//!
//! Configuration is optional. Every setting has a default and every setting
//! can be overridden on the command line.
//!
//! # Example Configuration
//!
//! ```toml
//! [scan]
//! root = "programs"
//! extension = "asm"
//!
//! [history]
//! git = "/usr/bin/git"
//!
//! [output]
//! path = "data/program_creation_dates.csv"
//! format = "table"
//! color = true
//!
//! [progress]
//! interval = 50
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".progdaterc.toml";

/// Errors raised by strict configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root configuration structure loaded from `.progdaterc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct ProgdateConfig {
    /// Where programs live and how they are named.
    #[serde(default)]
    pub scan: ScanConfig,

    /// History backend settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// CSV destination and console formatting.
    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub progress: ProgressConfig,
}

/// Program discovery settings.
#[derive(Debug, Deserialize, Default)]
pub struct ScanConfig {
    /// Program repository root. Relative paths resolve against the working
    /// directory.
    #[serde(default)]
    pub root: Option<String>,

    /// Program file extension (`asm` when unset).
    #[serde(default)]
    pub extension: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryConfig {
    /// Git binary to invoke (`git` on `PATH` when unset).
    #[serde(default)]
    pub git: Option<String>,
}

/// Output preferences.
///
/// Command-line flags (`--output`, `--format`) override these settings.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// CSV file to write.
    #[serde(default)]
    pub path: Option<String>,

    /// Console format: `table` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output.
    #[serde(default)]
    pub color: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProgressConfig {
    /// Report every N paths. Unset or 0 means `max(total / 1000, 1)`.
    #[serde(default)]
    pub interval: Option<usize>,
}

impl ProgdateConfig {
    /// Load configuration from `.progdaterc.toml` in the given directory.
    ///
    /// Missing or broken files yield defaults; problems are logged as
    /// warnings.
    pub fn load(dir: &Path) -> Self {
        match Self::load_strict(dir) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Like [`load`](Self::load) but a present-but-invalid file is an error.
    pub fn load_strict(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: config_path,
            source,
        })
    }

    pub fn root(&self) -> Option<&str> {
        self.scan.root.as_deref()
    }

    pub fn extension(&self) -> Option<&str> {
        self.scan.extension.as_deref()
    }

    pub fn git(&self) -> Option<&str> {
        self.history.git.as_deref()
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.path.as_deref()
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    /// Explicit progress interval; 0 is treated as unset.
    pub fn progress_interval(&self) -> Option<usize> {
        self.progress.interval.filter(|n| *n > 0)
    }
}
