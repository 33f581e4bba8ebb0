//! progdate CLI - program creation dates from git history
//!
//! Walks a directory of numerically named program files and records the date
//! each one was first committed, as a semicolon-separated CSV.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::*;
use config::ProgdateConfig;
use output::OutputFormat;

/// Extract program creation dates from version-control history.
#[derive(Parser)]
#[command(name = "progdate")]
#[command(author, version)]
#[command(about = "Extract program creation dates from git history")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  progdate dates programs            Write data/program_creation_dates.csv
  progdate dates . -o dates.csv      Write to a custom location
  progdate list programs             Show program ids without querying git")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Fail on .progdaterc.toml errors instead of silently using defaults
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve creation dates and write the CSV
    Dates {
        /// Program repository root (defaults to config, then current directory)
        root: Option<String>,

        /// CSV file to write
        #[arg(short, long)]
        output: Option<String>,

        /// Program file extension
        #[arg(short, long = "ext")]
        extension: Option<String>,

        /// Report progress every N programs (default: total/1000, at least 1)
        #[arg(long)]
        interval: Option<usize>,

        /// Git binary to use for history queries
        #[arg(long, env = "PROGDATE_GIT")]
        git: Option<String>,
    },

    /// List discovered programs and their ids
    #[command(visible_alias = "ls")]
    List {
        /// Program repository root (defaults to config, then current directory)
        root: Option<String>,

        /// Program file extension
        #[arg(short, long = "ext")]
        extension: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,

        /// Show installation instructions instead of generating completions
        #[arg(long)]
        instructions: bool,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let cwd = std::path::Path::new(".");
    let config = if cli.strict {
        ProgdateConfig::load_strict(cwd)?
    } else {
        ProgdateConfig::load(cwd)
    };

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Dates {
            root,
            output,
            extension,
            interval,
            git,
        } => {
            let args = dates::DatesArgs {
                root,
                output,
                extension,
                interval,
                git,
            };
            dates::run(args, &config, format, cli.quiet).await
        }
        Commands::List { root, extension } => list::run(root, extension, &config, format).await,
        Commands::Completions {
            shell,
            instructions,
        } => {
            if instructions {
                completions::run_instructions(shell, format)
            } else {
                let mut cmd = Cli::command();
                completions::generate_completions_with_cmd(shell, &mut cmd);
                Ok(())
            }
        }
    }
}
