#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

// Used only by the binary entry point
use dotenvy as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod one_shot;
pub mod parser;
pub mod presentation;
pub mod repl;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use error::CliError;
pub use logging::init_tracing;
pub use parser::Cli;
pub use presentation::{EMPTY_RESULT, OutputPrefs, present};
pub use repl::{HistoryMode, LineSource, ReadOutcome, Repl, ReplOptions};
