//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the shell is wired together:
//! - Data root and the settings store
//! - Log and history directories resolved from settings
//! - Output switches shared by the REPL and the `config` handlers
//! - The built-in command tree and its dispatcher
//!
//! Command-line flags override persisted settings for one session only.

use std::path::PathBuf;
use std::sync::Arc;

use madia_core::paths::{DEFAULT_HISTORY_DIR, DEFAULT_LOG_DIR};
use madia_core::{
    Dispatcher, Settings, SettingsStore, config_path, data_root, ensure_directory, history_file,
    resolve_dir,
};

use crate::error::CliError;
use crate::handlers::{self, DEFAULT_HANDLER, HandlerContext, notes::NoteBook};
use crate::parser::Cli;
use crate::presentation::OutputPrefs;
use crate::repl::{HistoryMode, ReplOptions};

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Directory holding settings, history and logs.
    pub data_root: PathBuf,
    /// Prompt for this session instead of the saved one.
    pub prompt: Option<String>,
    /// Force in-memory history.
    pub no_history: bool,
    /// Disable code highlighting for this session.
    pub plain: bool,
}

impl CliConfig {
    /// Config from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let data_root = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => data_root()?,
        };
        Ok(Self {
            data_root,
            prompt: cli.prompt.clone(),
            no_history: cli.no_history,
            plain: cli.plain,
        })
    }
}

/// Fully composed application context.
pub struct CliContext {
    store: Arc<SettingsStore>,
    handlers: HandlerContext,
    prompt: String,
}

impl CliContext {
    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    pub fn settings(&self) -> Settings {
        self.store.get()
    }

    pub fn handlers(&self) -> &HandlerContext {
        &self.handlers
    }

    pub fn log_dir(&self) -> &std::path::Path {
        &self.handlers.log_dir
    }

    pub fn log_prefix(&self) -> &str {
        &self.handlers.log_prefix
    }

    pub fn dispatcher(&self) -> Dispatcher {
        handlers::dispatcher(&self.handlers)
    }

    /// Options for the top-level REPL.
    pub fn repl_options(&self) -> ReplOptions {
        let history = self
            .handlers
            .history_dir
            .as_ref()
            .map_or(HistoryMode::InMemory, |dir| {
                HistoryMode::File(history_file(dir, &self.prompt, Some(DEFAULT_HANDLER)))
            });
        ReplOptions::new(self.prompt.clone())
            .with_history(history)
            .with_prefs(Arc::clone(&self.handlers.prefs))
    }
}

/// Bootstrap the CLI application.
///
/// Creates the data root, loads (or initializes) the settings file, and
/// resolves every directory the session writes to.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let root = &config.data_root;
    ensure_directory(root)?;

    let store = Arc::new(SettingsStore::open(config_path(root))?);
    let settings = store.get();

    let log_dir = resolve_dir(root, settings.log_dir.as_deref(), DEFAULT_LOG_DIR)?;
    let history_dir = if config.no_history || !settings.effective_persist_history() {
        None
    } else {
        let dir = resolve_dir(root, settings.history_dir.as_deref(), DEFAULT_HISTORY_DIR)?;
        ensure_directory(&dir)?;
        Some(dir)
    };

    let prefs = Arc::new(OutputPrefs::new(
        settings.effective_highlight_code() && !config.plain,
        settings.effective_print_result(),
    ));

    let prompt = config
        .prompt
        .clone()
        .unwrap_or_else(|| settings.effective_prompt().to_string());
    if prompt.is_empty() {
        return Err(CliError::Arguments("prompt cannot be empty".to_string()));
    }

    let handlers = HandlerContext {
        store: Arc::clone(&store),
        prefs,
        notes: Arc::new(NoteBook::default()),
        log_dir,
        log_prefix: settings.effective_log_filename().to_string(),
        history_dir,
    };

    Ok(CliContext {
        store,
        handlers,
        prompt,
    })
}
