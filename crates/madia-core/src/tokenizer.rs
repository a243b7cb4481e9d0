//! Shell-like tokenizer that tolerates half-typed quotes.
//!
//! Lines are split with POSIX word-splitting rules (via `shlex`). When the
//! user is still in the middle of a quoted argument, the split is retried
//! once with the most recently opened quote character closed at the end of
//! the line, so live completion keeps working while typing.
//!
//! `#` has no special meaning: a word starting with it is an ordinary word.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// Default number of lines kept by [`TokenCache`].
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

const QUOTE_CHARS: [char; 2] = ['\'', '"'];

/// Errors produced while splitting a line into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// The line ends with a backslash that escapes nothing.
    #[error("No escaped character")]
    DanglingEscape,

    /// A quote is still open after closing the last one typed.
    #[error("No closing quotation")]
    UnterminatedQuote,
}

/// Lexer state at the end of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnd {
    Complete,
    OpenQuote,
    DanglingEscape,
}

/// Split `text` into shell words.
///
/// Empty or whitespace-only input yields an empty vector. An unterminated
/// quote is repaired by appending the quote character whose last
/// occurrence is furthest to the right; any other failure is returned.
pub fn split(text: &str) -> Result<Vec<String>, TokenizeError> {
    let (mut guarded, end) = escape_comment_marks(text);
    if let Some(tokens) = shlex::split(&guarded) {
        return Ok(tokens);
    }

    if end != LineEnd::OpenQuote {
        return Err(TokenizeError::DanglingEscape);
    }
    let Some(quote) = closing_quote_for(text) else {
        return Err(TokenizeError::UnterminatedQuote);
    };

    guarded.push(quote);
    tracing::trace!(quote = %quote, "retrying split with closed quote");

    shlex::split(&guarded).ok_or(TokenizeError::UnterminatedQuote)
}

/// Backslash-escape each unquoted `#` that starts a word, so `shlex` keeps
/// it instead of dropping the rest of the line as a comment.
///
/// Also reports where the line ends: inside a quote, right after a lone
/// backslash, or cleanly.
fn escape_comment_marks(text: &str) -> (String, LineEnd) {
    let mut out = String::with_capacity(text.len() + 4);
    let mut chars = text.chars();
    let mut quote: Option<char> = None;
    let mut word_start = true;

    while let Some(ch) = chars.next() {
        match quote {
            Some('\'') => {
                out.push(ch);
                if ch == '\'' {
                    quote = None;
                }
            }
            Some(_) => {
                out.push(ch);
                match ch {
                    '"' => quote = None,
                    '\\' => match chars.next() {
                        Some(escaped) => out.push(escaped),
                        None => return (out, LineEnd::OpenQuote),
                    },
                    _ => {}
                }
            }
            None => {
                match ch {
                    ' ' | '\t' | '\n' => {
                        out.push(ch);
                        word_start = true;
                        continue;
                    }
                    '#' if word_start => out.push_str("\\#"),
                    '\\' => {
                        out.push(ch);
                        match chars.next() {
                            Some(escaped) => out.push(escaped),
                            None => return (out, LineEnd::DanglingEscape),
                        }
                    }
                    '\'' | '"' => {
                        out.push(ch);
                        quote = Some(ch);
                    }
                    _ => out.push(ch),
                }
                word_start = false;
            }
        }
    }

    let end = if quote.is_some() {
        LineEnd::OpenQuote
    } else {
        LineEnd::Complete
    };
    (out, end)
}

/// The quote character whose last occurrence is furthest right, if any.
fn closing_quote_for(text: &str) -> Option<char> {
    QUOTE_CHARS
        .iter()
        .filter_map(|&quote| text.rfind(quote).map(|pos| (pos, quote)))
        .max_by_key(|(pos, _)| *pos)
        .map(|(_, quote)| quote)
}

/// Least-recently-used cache in front of [`split`].
///
/// Tokenizing is pure, so completion can reuse results for lines it has
/// already seen while the user moves the cursor around. Errors are never
/// cached.
#[derive(Debug)]
pub struct TokenCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, Vec<String>>,
    /// Access order, least recently used first.
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl CacheState {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    fn insert(&mut self, key: String, tokens: Vec<String>, capacity: usize) {
        while self.entries.len() >= capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, tokens);
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl TokenCache {
    /// Create a cache holding at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Split `text`, serving repeated lines from the cache.
    pub fn split(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let mut state = self.lock();

        if let Some(tokens) = state.entries.get(text).cloned() {
            state.touch(text);
            state.hits += 1;
            return Ok(tokens);
        }

        state.misses += 1;
        tracing::trace!(misses = state.misses, "token cache miss");
        let tokens = split(text)?;
        if self.capacity > 0 {
            state.insert(text.to_string(), tokens.clone(), self.capacity);
        }
        Ok(tokens)
    }

    /// Maximum number of cached lines.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of lines currently cached.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache holds no lines.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        let state = self.lock();
        (state.hits, state.misses)
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
