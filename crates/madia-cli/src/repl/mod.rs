//! The interactive read-eval-print loop.
//!
//! The loop reads a line, hands it to the [`Dispatcher`], and presents the
//! outcome. Interrupts abandon the current line and re-prompt; end of input
//! or `exit`/`quit` stop the loop. Handler failures are reported and never
//! end the session.
//!
//! Line input sits behind [`LineSource`] so the loop can be driven by a
//! scripted source in tests and by rustyline on a terminal.

mod editor;
mod helper;
mod interrupt;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use madia_core::{Completer, Dispatcher, Outcome};

use crate::presentation::{OutputPrefs, present};

pub use editor::EditorSource;
pub use helper::ShellHelper;
pub use interrupt::interrupt_flag;

pub const EXIT_MESSAGE: &str = "Exiting REPL. See Ya!";
pub const INTERRUPT_MESSAGE: &str = "🎹🎹Interrupt, opsie, let's move on!";
pub const EOF_MESSAGE: &str = "Exiting REPL. Bye 👋🏻";

const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

/// Where the session history lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryMode {
    InMemory,
    File(PathBuf),
}

/// Per-REPL options fixed at construction.
#[derive(Debug, Clone)]
pub struct ReplOptions {
    pub prompt: String,
    pub history: HistoryMode,
    pub prefs: Arc<OutputPrefs>,
}

impl ReplOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            history: HistoryMode::InMemory,
            prefs: Arc::new(OutputPrefs::default()),
        }
    }

    #[must_use]
    pub fn with_history(mut self, history: HistoryMode) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn with_prefs(mut self, prefs: Arc<OutputPrefs>) -> Self {
        self.prefs = prefs;
        self
    }
}

/// One attempt at reading a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    Interrupted,
    Eof,
}

/// Supplier of input lines.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// Record a submitted line in the session history.
    fn add_history(&mut self, line: &str);

    /// Called once when the loop ends; persists history where applicable.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A prompt bound to a dispatcher.
pub struct Repl {
    dispatcher: Dispatcher,
    options: ReplOptions,
}

impl Repl {
    pub fn new(dispatcher: Dispatcher, options: ReplOptions) -> Self {
        Self {
            dispatcher,
            options,
        }
    }

    pub fn options(&self) -> &ReplOptions {
        &self.options
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run on the terminal until exit or end of input.
    pub fn run(&self) -> Result<()> {
        let completer = Completer::new(self.dispatcher.shared_tree());
        let mut source = EditorSource::new(completer, &self.options.history)?;
        let interrupted = interrupt_flag();
        let mut stdout = io::stdout();
        self.run_with(&mut source, &mut stdout, interrupted.as_deref())
    }

    /// Drive the loop from `source`, writing to `out`.
    ///
    /// `interrupted` is raised by a signal handler while a command runs; the
    /// result of that command is then dropped in favour of the interrupt
    /// message.
    pub fn run_with<S, W>(
        &self,
        source: &mut S,
        out: &mut W,
        interrupted: Option<&AtomicBool>,
    ) -> Result<()>
    where
        S: LineSource + ?Sized,
        W: Write,
    {
        let result = self.read_eval_loop(source, out, interrupted);
        let finished = source.finish();
        result.and(finished)
    }

    fn read_eval_loop<S, W>(
        &self,
        source: &mut S,
        out: &mut W,
        interrupted: Option<&AtomicBool>,
    ) -> Result<()>
    where
        S: LineSource + ?Sized,
        W: Write,
    {
        loop {
            let line = match source.read_line(&self.options.prompt)? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => {
                    writeln!(out, "\n{INTERRUPT_MESSAGE}")?;
                    continue;
                }
                ReadOutcome::Eof => {
                    writeln!(out, "\n{EOF_MESSAGE}\n")?;
                    return Ok(());
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            source.add_history(trimmed);

            if EXIT_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
                writeln!(out, "{EXIT_MESSAGE}")?;
                return Ok(());
            }

            self.eval(trimmed, out, interrupted)?;
        }
    }

    fn eval<W: Write>(
        &self,
        line: &str,
        out: &mut W,
        interrupted: Option<&AtomicBool>,
    ) -> io::Result<()> {
        if let Some(flag) = interrupted {
            flag.store(false, Ordering::SeqCst);
        }

        let result = self.dispatcher.execute(line);

        if interrupted.is_some_and(|flag| flag.swap(false, Ordering::SeqCst)) {
            tracing::info!(line, "command interrupted");
            return writeln!(out, "\n{INTERRUPT_MESSAGE}");
        }

        match result {
            Ok(Outcome::Empty) => Ok(()),
            Ok(outcome) => present(out, outcome, &self.options.prefs),
            Err(e) => {
                tracing::error!(line, error = %e, "command failed");
                writeln!(out, "Error: {e}")
            }
        }
    }
}
