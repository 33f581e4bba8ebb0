//! List command - Show discovered programs and their ids
//!
//! Runs only the discovery half of the batch: no history queries, no CSV.
//! Useful for reconciling a `dates` run against what is on disk.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use progdate_core::scanner::{scan_programs, DEFAULT_EXTENSION};
use progdate_core::ProgramPath;
use serde::Serialize;

use crate::config::ProgdateConfig;
use crate::output::{Output, OutputFormat, TableDisplay};

/// Programs found under a root.
#[derive(Debug, Serialize)]
pub struct ProgramListing {
    pub root: String,
    pub programs: Vec<ProgramPath>,
    /// Paths whose file name does not encode a program id.
    pub invalid: Vec<String>,
}

impl ProgramListing {
    fn from_paths(root: &Path, paths: Vec<String>) -> Self {
        let mut programs = Vec::new();
        let mut invalid = Vec::new();
        for path in paths {
            match ProgramPath::parse(path.as_str()) {
                Ok(program) => programs.push(program),
                Err(e) => {
                    tracing::warn!("{}", e);
                    invalid.push(path);
                }
            }
        }
        Self {
            root: root.display().to_string(),
            programs,
            invalid,
        }
    }
}

impl TableDisplay for ProgramListing {
    fn to_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "PROGRAMS:".cyan().bold(),
            self.root.yellow()
        ));
        output.push_str(&format!("{}\n", "-".repeat(50)));

        if self.programs.is_empty() && self.invalid.is_empty() {
            output.push_str(&"  No program files found.\n".dimmed().to_string());
            return output;
        }

        for program in &self.programs {
            output.push_str(&format!("{:>10}  {}\n", program.id, program.path));
        }
        for path in &self.invalid {
            output.push_str(&format!("{}  {}\n", format!("{:>10}", "?").red(), path.dimmed()));
        }

        output.push_str(&format!(
            "\n{} programs, {} invalid names\n",
            self.programs.len(),
            self.invalid.len()
        ));
        output
    }
}

/// Run the list command
pub async fn run(
    root: Option<String>,
    extension: Option<String>,
    config: &ProgdateConfig,
    format: OutputFormat,
) -> Result<()> {
    let root = root
        .or_else(|| config.root().map(str::to_string))
        .unwrap_or_else(|| ".".to_string());
    let extension = extension
        .or_else(|| config.extension().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    let root = Path::new(&root);
    let scan = scan_programs(root, &extension)
        .with_context(|| format!("Failed to list programs in {}", root.display()))?;

    Output::new(ProgramListing::from_paths(root, scan.paths), format).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_splits_invalid() {
        let listing = ProgramListing::from_paths(
            Path::new("programs"),
            vec![
                "00045.asm".to_string(),
                "bogus.asm".to_string(),
                "oeis/A000040.asm".to_string(),
            ],
        );
        assert_eq!(listing.programs.len(), 2);
        assert_eq!(listing.programs[0].id.value(), 45);
        assert_eq!(listing.programs[1].id.value(), 40);
        assert_eq!(listing.invalid, vec!["bogus.asm"]);
    }

    #[test]
    fn test_listing_table() {
        colored::control::set_override(false);
        let listing = ProgramListing::from_paths(
            Path::new("programs"),
            vec!["00045.asm".to_string(), "bogus.asm".to_string()],
        );
        let table = listing.to_table();
        assert!(table.contains("PROGRAMS: programs"));
        assert!(table.contains("        45  00045.asm"));
        assert!(table.contains("1 programs, 1 invalid names"));
    }

    #[test]
    fn test_empty_listing_table() {
        let listing = ProgramListing::from_paths(Path::new("programs"), Vec::new());
        assert!(listing.to_table().contains("No program files found."));
    }
}
