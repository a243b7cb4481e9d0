//! Rustyline glue: tree completion, history hints, dimmed hint text.

use std::borrow::Cow;

use crossterm::style::Stylize;
use madia_core::{Completer as TreeCompleter, Completion};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Editor helper backed by the command tree.
pub struct ShellHelper {
    completer: TreeCompleter,
    hinter: HistoryHinter,
}

impl ShellHelper {
    pub fn new(completer: TreeCompleter) -> Self {
        Self {
            completer,
            hinter: HistoryHinter {},
        }
    }

    /// Byte offset where replacements start, plus the candidates.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let before = &line[..pos];
        let mut start = pos;
        let mut pairs = Vec::new();

        for completion in self.completer.complete(before) {
            start = replacement_start(before, completion.replaced_len());
            pairs.push(to_pair(before, completion));
        }

        (start, pairs)
    }
}

/// Byte index `chars` characters back from the end of `before`.
fn replacement_start(before: &str, chars: usize) -> usize {
    if chars == 0 {
        return before.len();
    }
    before
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map_or(0, |(index, _)| index)
}

// A candidate inserted right after a complete word needs a separator.
fn to_pair(before: &str, completion: Completion) -> Pair {
    let replacement = if completion.replaced_len() == 0
        && !before.is_empty()
        && !before.ends_with(char::is_whitespace)
    {
        format!(" {}", completion.text)
    } else {
        completion.text.clone()
    };
    Pair {
        display: completion.text,
        replacement,
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ShellHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dark_grey().to_string())
    }
}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}
