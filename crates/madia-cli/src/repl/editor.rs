//! Terminal line source built on rustyline.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use madia_core::Completer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};

use super::{HistoryMode, LineSource, ReadOutcome, ShellHelper};

/// Reads lines from the terminal with completion and history.
pub struct EditorSource {
    editor: Editor<ShellHelper, DefaultHistory>,
    history_file: Option<PathBuf>,
}

impl EditorSource {
    pub fn new(completer: Completer, history: &HistoryMode) -> Result<Self> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();
        let mut editor = Editor::with_config(config).context("Failed to initialize line editor")?;
        editor.set_helper(Some(ShellHelper::new(completer)));

        let history_file = match history {
            HistoryMode::InMemory => None,
            HistoryMode::File(path) => {
                if path.exists() {
                    if let Err(e) = editor.load_history(path) {
                        tracing::warn!(path = %path.display(), error = %e, "could not load history");
                    }
                }
                Some(path.clone())
            }
        };

        Ok(Self {
            editor,
            history_file,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            tracing::debug!(error = %e, "history entry dropped");
        }
    }

    fn finish(&mut self) -> Result<()> {
        let Some(path) = &self.history_file else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        self.editor
            .save_history(path)
            .with_context(|| format!("Failed to save history to {}", path.display()))
    }
}
