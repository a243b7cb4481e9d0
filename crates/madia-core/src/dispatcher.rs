//! Resolve a command line to the deepest matching handler and run it.
//!
//! Words are matched left to right against the tree. The deepest matched
//! node that carries a handler wins; the words after it are joined with
//! single spaces and passed as the handler's only argument. When nothing
//! along the path is callable, the default handler (if any) receives the
//! remaining text instead.
//!
//! Unresolvable input is a normal outcome reported as text, not an error.
//! Handler faults are not caught here; they are returned to the caller.

use std::sync::Arc;

use thiserror::Error;

use crate::tokenizer::{self, TokenizeError};
use crate::tree::{CommandMap, CommandTree, Handler, Node, render_help, render_tree_help};

/// Token that asks for help on the command typed so far.
pub const HELP_TOKEN: &str = "?";

/// Failures while executing a line.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error("{handler} failed: {error:#}")]
    Handler {
        handler: String,
        error: anyhow::Error,
    },
}

/// Result of executing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The line held no words.
    Empty,
    /// Help text requested with `?`.
    Help(String),
    /// A handler ran and returned this.
    Output(Option<String>),
    /// Nothing could be resolved; message for the user.
    Unresolved(String),
}

impl Outcome {
    /// Flatten into the text to present, if any.
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Help(text) | Self::Unresolved(text) => Some(text),
            Self::Output(text) => text,
        }
    }
}

/// What a token sequence resolves to, before anything is invoked.
#[derive(Debug)]
pub enum Resolution<'t> {
    /// Call `handler` with the tokens from index `consumed` onward.
    Call { handler: &'t Handler, consumed: usize },
    /// Help requested.
    Help(String),
    /// `token` matched nothing and there is no default handler.
    Unmatched { token: String },
    /// Every word matched but no node on the path is callable.
    NoHandler,
}

/// Dispatches command lines against a read-only command tree.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tree: Arc<CommandTree>,
    default: Option<Handler>,
}

impl Dispatcher {
    pub fn new(tree: Arc<CommandTree>) -> Self {
        Self {
            tree,
            default: None,
        }
    }

    /// Handler used when no node on the matched path is callable.
    #[must_use]
    pub fn with_default(mut self, handler: Handler) -> Self {
        self.default = Some(handler);
        self
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn shared_tree(&self) -> Arc<CommandTree> {
        Arc::clone(&self.tree)
    }

    pub fn default_handler(&self) -> Option<&Handler> {
        self.default.as_ref()
    }

    /// Work out which handler `tokens` map to without calling it.
    pub fn resolve(&self, tokens: &[String]) -> Resolution<'_> {
        let mut level: Option<&CommandMap> = Some(&self.tree);
        let mut last: Option<(&str, &Node)> = None;
        let mut deepest: Option<(&Handler, usize)> = None;
        let mut unmatched: Option<usize> = None;

        for (index, token) in tokens.iter().enumerate() {
            if token == HELP_TOKEN {
                let text = match last {
                    Some((key, node)) => render_help(key, node),
                    None => render_tree_help(&self.tree),
                };
                return Resolution::Help(text);
            }

            let Some((key, node)) = level.and_then(|map| map.lookup(token)) else {
                unmatched = Some(index);
                break;
            };

            if let Some(handler) = node.handler() {
                deepest = Some((handler, index + 1));
            }
            last = Some((key, node));
            level = node.children();
        }

        if let Some((handler, consumed)) = deepest {
            return Resolution::Call { handler, consumed };
        }

        if let Some(handler) = &self.default {
            // A walk that used up every word stops on the last one.
            let stop = unmatched.unwrap_or(tokens.len().saturating_sub(1));
            return Resolution::Call {
                handler,
                consumed: stop.saturating_sub(1),
            };
        }

        match unmatched {
            Some(index) => Resolution::Unmatched {
                token: tokens[index].clone(),
            },
            None => Resolution::NoHandler,
        }
    }

    /// Tokenize, resolve, and run `line`.
    pub fn execute(&self, line: &str) -> Result<Outcome, DispatchError> {
        let tokens = tokenizer::split(line)?;
        if tokens.is_empty() {
            return Ok(Outcome::Empty);
        }

        match self.resolve(&tokens) {
            Resolution::Call { handler, consumed } => {
                let args = tokens[consumed..].join(" ");
                tracing::debug!(handler = handler.name(), args = %args, "dispatching");
                handler
                    .call(&args)
                    .map(Outcome::Output)
                    .map_err(|error| DispatchError::Handler {
                        handler: handler.name().to_string(),
                        error,
                    })
            }
            Resolution::Help(text) => Ok(Outcome::Help(text)),
            Resolution::Unmatched { token } => {
                tracing::debug!(token = %token, "unmatched command");
                Ok(Outcome::Unresolved(format!("Invalid command: {token}")))
            }
            Resolution::NoHandler => Ok(Outcome::Unresolved(format!(
                "'{line}' does not map to a valid function."
            ))),
        }
    }
}
