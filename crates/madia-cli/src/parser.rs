//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

/// Command-line interface for the madia shell.
///
/// With no trailing words the interactive REPL starts. Any trailing words are
/// run once as a shell command line and the process exits.
#[derive(Parser, Debug)]
#[command(name = "madia")]
#[command(about = "Interactive command shell with tree-driven completion")]
#[command(version)]
pub struct Cli {
    /// Override the data directory (settings, history, logs)
    #[arg(long = "data-dir", env = "MADIA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose/debug output on stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Prompt for this session, overriding the saved setting
    #[arg(long)]
    pub prompt: Option<String>,

    /// Keep history in memory only for this session
    #[arg(long = "no-history")]
    pub no_history: bool,

    /// Print results without code highlighting
    #[arg(long)]
    pub plain: bool,

    /// Command line to run once instead of starting the REPL
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Whether a one-shot command line was given.
    pub fn is_one_shot(&self) -> bool {
        !self.command.is_empty()
    }
}
