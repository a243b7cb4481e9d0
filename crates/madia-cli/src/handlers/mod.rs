//! Built-in shell commands.
//!
//! Each submodule contributes a subtree; [`command_tree`] assembles them.
//! Handlers get their dependencies through [`HandlerContext`], built once
//! by the bootstrap.

pub mod config;
pub mod demo;
pub mod notes;
pub mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use madia_core::{CommandMap, CommandTree, Dispatcher, Handler, SettingsStore};

use crate::presentation::OutputPrefs;
use notes::NoteBook;

/// Name of the fallback handler for free text.
pub const DEFAULT_HANDLER: &str = "echo";

/// Dependencies shared by the built-in handlers.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub store: Arc<SettingsStore>,
    pub prefs: Arc<OutputPrefs>,
    pub notes: Arc<NoteBook>,
    pub log_dir: PathBuf,
    pub log_prefix: String,
    /// `None` keeps nested REPL history in memory.
    pub history_dir: Option<PathBuf>,
}

/// The full top-level command tree.
pub fn command_tree(ctx: &HandlerContext) -> CommandTree {
    let mut tree = CommandMap::new();
    for (name, node) in demo::nodes() {
        tree.insert(name, node);
    }
    tree.insert("config", config::branch(ctx));
    tree.insert("notes", notes::branch(&ctx.notes));
    tree.insert("shell", shell::leaf(ctx));
    tree
}

/// Fallback for lines that match no command: echo them back.
pub fn default_handler() -> Handler {
    Handler::new(DEFAULT_HANDLER, |args| Ok(Some(args.to_string())))
}

/// Dispatcher over the built-in tree with the echo fallback.
pub fn dispatcher(ctx: &HandlerContext) -> Dispatcher {
    Dispatcher::new(Arc::new(command_tree(ctx))).with_default(default_handler())
}

/// Parse an `on`/`off` style switch.
pub(crate) fn parse_switch(value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => anyhow::bail!("expected 'on' or 'off', got '{other}'"),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// Context rooted in a fresh temporary directory.
    pub fn context() -> (TempDir, HandlerContext) {
        let temp = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(temp.path().join("config.yaml")).unwrap();
        let ctx = HandlerContext {
            store: Arc::new(store),
            prefs: Arc::new(OutputPrefs::default()),
            notes: Arc::new(NoteBook::default()),
            log_dir: temp.path().join("logs"),
            log_prefix: "madia.log".to_string(),
            history_dir: None,
        };
        (temp, ctx)
    }
}
