//! Run a single command line given on the process command line.

use std::io::Write;

use madia_core::Dispatcher;

use crate::error::CliError;
use crate::presentation::{OutputPrefs, present};

pub const BANNER: &str = "This is a shortcut, for any Madia Command that you can run via REPL";

/// Re-quote argv words so the shell tokenizer sees them as typed.
pub fn command_line(words: &[String]) -> Result<String, CliError> {
    shlex::try_join(words.iter().map(String::as_str))
        .map_err(|e| CliError::Arguments(e.to_string()))
}

/// Dispatch `words` once and present the outcome.
///
/// Unlike the REPL, a failing handler fails the process.
pub fn run_once<W: Write>(
    dispatcher: &Dispatcher,
    words: &[String],
    prefs: &OutputPrefs,
    out: &mut W,
) -> Result<(), CliError> {
    let line = command_line(words)?;
    writeln!(out, "{BANNER}\n")?;
    tracing::debug!(line = %line, "one-shot command");

    let outcome = dispatcher.execute(&line)?;
    present(out, outcome, prefs)?;
    Ok(())
}
