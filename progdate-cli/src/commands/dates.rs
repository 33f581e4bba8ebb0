//! Dates command - Write the program creation-date CSV
//!
//! Scans the program root, asks git when each program file was first added
//! and writes `program id;creation date` rows. Progress goes to the console
//! while the batch runs; a reconciliation summary is printed at the end.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use progdate_core::emitter::DEFAULT_OUTPUT_PATH;
use progdate_core::history::DEFAULT_GIT;
use progdate_core::scanner::DEFAULT_EXTENSION;
use progdate_core::{
    GitHistory, Pipeline, PipelineConfig, ProgressObserver, ProgressUpdate, RunSummary,
};

use crate::config::ProgdateConfig;
use crate::output::{Output, OutputFormat, TableDisplay};

/// Command-line overrides for the dates command.
#[derive(Debug, Default, Clone)]
pub struct DatesArgs {
    pub root: Option<String>,
    pub output: Option<String>,
    pub extension: Option<String>,
    pub interval: Option<usize>,
    pub git: Option<String>,
}

/// Fully resolved settings: CLI flag > config file > default.
#[derive(Debug, Clone, PartialEq)]
pub struct DatesSettings {
    pub root: PathBuf,
    pub output: PathBuf,
    pub extension: String,
    pub interval: Option<usize>,
    pub git: String,
}

impl DatesSettings {
    pub fn resolve(args: DatesArgs, config: &ProgdateConfig) -> Self {
        Self {
            root: PathBuf::from(
                args.root
                    .or_else(|| config.root().map(str::to_string))
                    .unwrap_or_else(|| ".".to_string()),
            ),
            output: PathBuf::from(
                args.output
                    .or_else(|| config.output_path().map(str::to_string))
                    .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string()),
            ),
            extension: args
                .extension
                .or_else(|| config.extension().map(str::to_string))
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            interval: args
                .interval
                .filter(|n| *n > 0)
                .or_else(|| config.progress_interval()),
            git: args
                .git
                .or_else(|| config.git().map(str::to_string))
                .unwrap_or_else(|| DEFAULT_GIT.to_string()),
        }
    }
}

/// Where progress lines go.
enum ConsoleProgress {
    Hidden,
    /// Interactive progress bar on stderr.
    Bar(ProgressBar),
    /// Plain status lines, on stderr when stdout carries JSON.
    Lines { stderr: bool },
}

impl ConsoleProgress {
    fn for_run(format: OutputFormat, quiet: bool) -> Self {
        if quiet {
            ConsoleProgress::Hidden
        } else if std::io::stderr().is_terminal() {
            ConsoleProgress::Bar(create_progress_bar())
        } else {
            ConsoleProgress::Lines {
                stderr: format == OutputFormat::Json,
            }
        }
    }

    fn finish(&self) {
        if let ConsoleProgress::Bar(bar) = self {
            bar.finish_and_clear();
        }
    }
}

impl ProgressObserver for ConsoleProgress {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        tracing::debug!("{}", update);
        match self {
            ConsoleProgress::Hidden => {}
            ConsoleProgress::Bar(bar) => {
                bar.set_length(update.total as u64);
                bar.set_position(update.index as u64);
                bar.set_message(update.to_string());
            }
            ConsoleProgress::Lines { stderr: true } => eprintln!("{}", update),
            ConsoleProgress::Lines { stderr: false } => println!("{}", update),
        }
    }
}

fn create_progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} {bar:40.cyan/blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    bar
}

impl TableDisplay for RunSummary {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} {}",
            "rows written:".green().bold(),
            self.rows_written
        ));
        lines.push(format!("  {}: {}", "Programs found".cyan(), self.paths_discovered));

        let skipped = self.skipped.total();
        if skipped > 0 {
            lines.push(format!("  {}: {}", "Skipped".yellow(), skipped));
            let reasons = [
                ("invalid program id", self.skipped.invalid_program_id),
                ("history query failed", self.skipped.history_query_failed),
                ("never committed", self.skipped.no_history),
                ("invalid timestamp", self.skipped.invalid_timestamp),
            ];
            for (label, count) in reasons.iter().filter(|(_, n)| *n > 0) {
                lines.push(format!("    {}: {}", label, count));
            }
        } else {
            lines.push(format!("  {}: 0", "Skipped".cyan()));
        }

        lines.push(format!("  {}: {}", "Output".cyan(), self.output));
        lines.push(format!("{}", format!("({} ms)", self.duration_ms).dimmed()));

        lines.join("\n")
    }
}

/// Run the dates command
pub async fn run(
    args: DatesArgs,
    config: &ProgdateConfig,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let settings = DatesSettings::resolve(args, config);
    tracing::debug!("Resolved settings: {:?}", settings);

    let pipeline_config = PipelineConfig::new(&settings.root)
        .with_extension(settings.extension.clone())
        .with_output(&settings.output)
        .with_progress_interval(settings.interval);
    let history = GitHistory::new(&settings.root).with_git(settings.git.clone());
    let pipeline = Pipeline::new(pipeline_config, history);

    let mut progress = ConsoleProgress::for_run(format, quiet);

    // One git process per path; keep the blocking loop off the async workers
    let (summary, progress) = tokio::task::spawn_blocking(move || {
        let result = pipeline.run(&mut progress);
        (result, progress)
    })
    .await
    .context("creation-date worker panicked")?;
    progress.finish();

    let summary = summary.with_context(|| {
        format!(
            "Failed to extract creation dates from {}",
            settings.root.display()
        )
    })?;

    Output::new(summary, format).render()
}
