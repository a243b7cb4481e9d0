//! Terminal syntax highlighting for fenced code blocks in handler output.
//!
//! Blocks of the form
//!
//! ~~~text
//! ```lang
//! code
//! ```
//! ~~~
//!
//! are detected with a regex. When `lang` names a bundled grammar, the code
//! is highlighted with tree-sitter and rendered with ANSI colours; the fences
//! are kept. Blocks with unknown or missing tags are left untouched.

mod languages;

pub use languages::{normalize_language_name, supported_languages};

use std::collections::HashMap;
use std::fmt::Write as _;

use crossterm::style::{Color, Stylize, style};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;
use tree_sitter_highlight::{Highlight, HighlightConfiguration, HighlightEvent, Highlighter};

/// Errors that can occur during highlighting.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("language not supported: {0}")]
    UnknownLanguage(String),

    #[error("invalid highlight query for {language}: {source}")]
    Query {
        language: &'static str,
        source: tree_sitter::QueryError,
    },

    #[error(transparent)]
    Highlight(#[from] tree_sitter_highlight::Error),
}

/// Capture names we colour, with their colour. Order defines highlight indices.
const THEME: &[(&str, Color)] = &[
    ("attribute", Color::Yellow),
    ("comment", Color::DarkGrey),
    ("constant", Color::Magenta),
    ("constructor", Color::Yellow),
    ("escape", Color::Cyan),
    ("function", Color::Blue),
    ("function.builtin", Color::Cyan),
    ("function.macro", Color::Cyan),
    ("keyword", Color::Red),
    ("number", Color::Magenta),
    ("operator", Color::White),
    ("property", Color::Cyan),
    ("string", Color::Green),
    ("type", Color::Yellow),
    ("variable.builtin", Color::Red),
    ("variable.parameter", Color::DarkYellow),
];

static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(.*?)\n(.*?)```").expect("fence pattern is valid"));

/// Shared highlighter with every bundled grammar compiled once.
pub static DEFAULT_HIGHLIGHTER: Lazy<CodeHighlighter> = Lazy::new(CodeHighlighter::new);

/// Highlight every recognised fenced block in `text` with the shared highlighter.
pub fn highlight_code_blocks(text: &str) -> String {
    DEFAULT_HIGHLIGHTER.highlight_blocks(text)
}

/// Compiled grammars keyed by canonical language name.
pub struct CodeHighlighter {
    configs: HashMap<&'static str, HighlightConfiguration>,
}

impl std::fmt::Debug for CodeHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.configs.keys().collect();
        names.sort_unstable();
        f.debug_struct("CodeHighlighter").field("languages", &names).finish()
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeHighlighter {
    /// Compile every bundled grammar. Grammars that fail to compile are skipped.
    pub fn new() -> Self {
        let recognized: Vec<&str> = THEME.iter().map(|(name, _)| *name).collect();
        let mut configs = HashMap::new();

        for &lang in supported_languages() {
            match languages::configuration(lang, &recognized) {
                Ok(config) => {
                    configs.insert(lang, config);
                }
                Err(e) => tracing::warn!(language = lang, error = %e, "grammar unavailable"),
            }
        }

        Self { configs }
    }

    /// Whether `lang` (or an alias of it) can be highlighted.
    pub fn has_language(&self, lang: &str) -> bool {
        normalize_language_name(lang).is_some_and(|name| self.configs.contains_key(name))
    }

    /// Highlight `source` as `lang`, returning ANSI-coloured text.
    pub fn highlight(&self, source: &str, lang: &str) -> Result<String, HighlightError> {
        let config = normalize_language_name(lang)
            .and_then(|name| self.configs.get(name))
            .ok_or_else(|| HighlightError::UnknownLanguage(lang.to_string()))?;

        let bytes = source.as_bytes();
        let mut highlighter = Highlighter::new();
        let events = highlighter.highlight(config, bytes, None, |_| None)?;

        let mut out = String::with_capacity(source.len() * 2);
        let mut stack: Vec<Color> = Vec::new();

        for event in events {
            match event? {
                HighlightEvent::Source { start, end } => {
                    let chunk = String::from_utf8_lossy(&bytes[start..end]);
                    match stack.last() {
                        Some(&color) => {
                            let _ = write!(out, "{}", style(chunk).with(color));
                        }
                        None => out.push_str(&chunk),
                    }
                }
                HighlightEvent::HighlightStart(Highlight(index)) => {
                    let color = THEME
                        .get(index)
                        .map(|(_, color)| *color)
                        .or_else(|| stack.last().copied())
                        .unwrap_or(Color::Reset);
                    stack.push(color);
                }
                HighlightEvent::HighlightEnd => {
                    stack.pop();
                }
            }
        }

        Ok(out)
    }

    /// Highlight every fenced block whose tag names a bundled grammar.
    pub fn highlight_blocks(&self, text: &str) -> String {
        FENCE
            .replace_all(text, |caps: &Captures<'_>| {
                let tag = &caps[1];
                let code = &caps[2];
                if !self.has_language(tag) {
                    return caps[0].to_string();
                }
                match self.highlight(code, tag) {
                    Ok(coloured) => format!("```{tag}\n{coloured}```"),
                    Err(e) => {
                        tracing::debug!(language = tag, error = %e, "highlighting skipped");
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }
}
