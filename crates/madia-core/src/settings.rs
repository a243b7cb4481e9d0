//! Settings domain types and validation.
//!
//! These are pure domain types; reading and writing the settings file lives
//! in [`crate::store`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prompt shown by the top-level REPL.
pub const DEFAULT_PROMPT: &str = ">>> ";

/// File name prefix of the daily-rotated log files.
pub const DEFAULT_LOG_FILENAME: &str = "madia.log";

/// Application settings.
///
/// All fields are optional to support partial files and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Prompt string for the top-level REPL.
    pub prompt: Option<String>,

    /// Persist REPL history to disk instead of keeping it in memory.
    pub persist_history: Option<bool>,

    /// Directory for history files. Relative paths are under the data root.
    pub history_dir: Option<String>,

    /// Directory for log files. Relative paths are under the data root.
    pub log_dir: Option<String>,

    /// Log file name prefix.
    pub log_filename: Option<String>,

    /// Highlight fenced code blocks in handler output.
    pub highlight_code: Option<bool>,

    /// Print handler results (disable for handlers that print themselves).
    pub print_result: Option<bool>,

    /// When the shell was last started.
    pub last_run: Option<DateTime<Utc>>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            prompt: Some(DEFAULT_PROMPT.to_string()),
            persist_history: Some(true),
            history_dir: None,
            log_dir: None,
            log_filename: Some(DEFAULT_LOG_FILENAME.to_string()),
            highlight_code: Some(true),
            print_result: Some(true),
            last_run: None,
        }
    }

    pub fn effective_prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    pub fn effective_log_filename(&self) -> &str {
        self.log_filename.as_deref().unwrap_or(DEFAULT_LOG_FILENAME)
    }

    pub fn effective_persist_history(&self) -> bool {
        self.persist_history.unwrap_or(true)
    }

    pub fn effective_highlight_code(&self) -> bool {
        self.highlight_code.unwrap_or(true)
    }

    pub fn effective_print_result(&self) -> bool {
        self.print_result.unwrap_or(true)
    }

    /// Merge an update into this one, only touching fields that are `Some`.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref prompt) = other.prompt {
            self.prompt.clone_from(prompt);
        }
        if let Some(persist) = other.persist_history {
            self.persist_history = persist;
        }
        if let Some(ref dir) = other.history_dir {
            self.history_dir.clone_from(dir);
        }
        if let Some(ref dir) = other.log_dir {
            self.log_dir.clone_from(dir);
        }
        if let Some(ref name) = other.log_filename {
            self.log_filename.clone_from(name);
        }
        if let Some(highlight) = other.highlight_code {
            self.highlight_code = highlight;
        }
        if let Some(print) = other.print_result {
            self.print_result = print;
        }
        if let Some(last_run) = other.last_run {
            self.last_run = last_run;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset the field
/// - `Some(Some(value))` = set the field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub prompt: Option<Option<String>>,
    pub persist_history: Option<Option<bool>>,
    pub history_dir: Option<Option<String>>,
    pub log_dir: Option<Option<String>>,
    pub log_filename: Option<Option<String>>,
    pub highlight_code: Option<Option<bool>>,
    pub print_result: Option<Option<bool>>,
    pub last_run: Option<Option<DateTime<Utc>>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("{0} cannot be empty")]
    EmptyDirectory(&'static str),

    #[error("Log file name cannot be empty")]
    EmptyLogFilename,

    #[error("Log file name must not contain path separators, got {0:?}")]
    InvalidLogFilename(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.prompt.as_ref().is_some_and(String::is_empty) {
        return Err(SettingsError::EmptyPrompt);
    }

    if settings
        .history_dir
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyDirectory("history_dir"));
    }

    if settings
        .log_dir
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyDirectory("log_dir"));
    }

    if let Some(name) = &settings.log_filename {
        if name.trim().is_empty() {
            return Err(SettingsError::EmptyLogFilename);
        }
        if name.contains(['/', '\\']) {
            return Err(SettingsError::InvalidLogFilename(name.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.prompt.as_deref(), Some(DEFAULT_PROMPT));
        assert_eq!(settings.persist_history, Some(true));
        assert_eq!(settings.highlight_code, Some(true));
        assert_eq!(settings.print_result, Some(true));
        assert_eq!(settings.log_filename.as_deref(), Some(DEFAULT_LOG_FILENAME));
        assert_eq!(settings.last_run, None);
    }

    #[test]
    fn test_validate_settings_valid() {
        assert!(validate_settings(&Settings::with_defaults()).is_ok());
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_prompt() {
        let settings = Settings {
            prompt: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyPrompt)
        );
    }

    #[test]
    fn test_validate_blank_directories() {
        let settings = Settings {
            history_dir: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyDirectory("history_dir"))
        );

        let settings = Settings {
            log_dir: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyDirectory("log_dir"))
        );
    }

    #[test]
    fn test_validate_log_filename() {
        let settings = Settings {
            log_filename: Some("logs/app.log".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidLogFilename(_))
        ));

        let settings = Settings {
            log_filename: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyLogFilename)
        );
    }

    #[test]
    fn test_merge_settings() {
        let mut settings = Settings::with_defaults();
        let update = SettingsUpdate {
            highlight_code: Some(Some(false)),
            prompt: Some(None),
            ..Default::default()
        };
        settings.merge(&update);

        assert_eq!(settings.highlight_code, Some(false));
        assert_eq!(settings.prompt, None);
        assert_eq!(settings.print_result, Some(true));
    }

    #[test]
    fn test_effective_values_fall_back() {
        let settings = Settings::default();
        assert_eq!(settings.effective_prompt(), DEFAULT_PROMPT);
        assert_eq!(settings.effective_log_filename(), DEFAULT_LOG_FILENAME);
        assert!(settings.effective_persist_history());
        assert!(settings.effective_highlight_code());
        assert!(settings.effective_print_result());
    }
}
