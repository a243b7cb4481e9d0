//! Shared CLI presentation utilities.
//!
//! Format-only: decides what a dispatch outcome looks like on the terminal.
//! Nothing here touches the command tree or settings storage.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use madia_core::{Outcome, highlight_code_blocks};

/// Printed when a handler ran but returned nothing.
pub const EMPTY_RESULT: &str = "The function didn't output any text.";

/// Output switches shared between the REPL and the handlers that flip them.
#[derive(Debug)]
pub struct OutputPrefs {
    highlight: AtomicBool,
    print: AtomicBool,
}

impl OutputPrefs {
    pub fn new(highlight: bool, print: bool) -> Self {
        Self {
            highlight: AtomicBool::new(highlight),
            print: AtomicBool::new(print),
        }
    }

    pub fn highlight(&self) -> bool {
        self.highlight.load(Ordering::Relaxed)
    }

    pub fn print(&self) -> bool {
        self.print.load(Ordering::Relaxed)
    }

    pub fn set_highlight(&self, on: bool) {
        self.highlight.store(on, Ordering::Relaxed);
    }

    pub fn set_print(&self, on: bool) {
        self.print.store(on, Ordering::Relaxed);
    }
}

impl Default for OutputPrefs {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Text to show for a handler result, or `None` when printing is off.
pub fn render_result(result: Option<&str>, prefs: &OutputPrefs) -> Option<String> {
    if !prefs.print() {
        return None;
    }
    Some(match result {
        Some(text) if prefs.highlight() => highlight_code_blocks(text),
        Some(text) => text.to_string(),
        None => EMPTY_RESULT.to_string(),
    })
}

/// Write a dispatch outcome.
///
/// Help and resolution messages are always shown. Handler output follows
/// the print and highlight switches.
pub fn present<W: Write>(out: &mut W, outcome: Outcome, prefs: &OutputPrefs) -> io::Result<()> {
    let text = match outcome {
        Outcome::Empty => None,
        Outcome::Help(text) | Outcome::Unresolved(text) => Some(text),
        Outcome::Output(result) => render_result(result.as_deref(), prefs),
    };
    if let Some(text) = text {
        writeln!(out, "{text}")?;
    }
    out.flush()
}
