//! Completions command - shell completion scripts for progdate

use clap::Command;
use clap_complete::{generate, Shell};
use colored::Colorize;
use serde::Serialize;

use crate::output::{Output, OutputFormat, TableDisplay};

const BIN_NAME: &str = "progdate";

/// How to hook the generated script into a shell
#[derive(Debug, Serialize)]
pub struct CompletionInstructions {
    pub shell: String,
    pub steps: Vec<String>,
}

impl TableDisplay for CompletionInstructions {
    fn to_table(&self) -> String {
        let mut lines = vec![format!("{} ({})", "Install completions".cyan().bold(), self.shell)];
        lines.extend(self.steps.iter().map(|step| format!("  {}", step)));
        lines.join("\n")
    }
}

fn install_steps(shell: Shell) -> Vec<String> {
    match shell {
        Shell::Bash => vec![format!(
            "echo 'eval \"$({} completions bash)\"' >> ~/.bashrc",
            BIN_NAME
        )],
        Shell::Zsh => vec![
            format!("{} completions zsh > ~/.zfunc/_{}", BIN_NAME, BIN_NAME),
            "add `fpath=(~/.zfunc $fpath)` to ~/.zshrc before compinit".to_string(),
        ],
        other => vec![format!(
            "{} completions {} > <your {} completion dir>/{}",
            BIN_NAME, other, other, BIN_NAME
        )],
    }
}

/// Write the completion script for `shell` to stdout
pub fn generate_completions_with_cmd(shell: Shell, cmd: &mut Command) {
    generate(shell, cmd, BIN_NAME, &mut std::io::stdout());
}

/// Print installation steps for `shell`
pub fn run_instructions(shell: Shell, format: OutputFormat) -> anyhow::Result<()> {
    let instructions = CompletionInstructions {
        shell: shell.to_string(),
        steps: install_steps(shell),
    };
    Output::new(instructions, format).render()
}
