//! YAML-backed settings persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::settings::{Settings, SettingsError, SettingsUpdate, validate_settings};

/// Errors from loading or saving the settings file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access settings file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] SettingsError),
}

/// Settings file plus the in-memory copy handlers read and update.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: Mutex<Settings>,
}

impl SettingsStore {
    /// Load settings from `path`, writing defaults there if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let settings = if path.exists() {
            read_settings(&path)?
        } else {
            tracing::info!(path = %path.display(), "writing default settings");
            let defaults = Settings::with_defaults();
            write_settings(&path, &defaults)?;
            defaults
        };

        Ok(Self {
            path,
            current: Mutex::new(settings),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current settings.
    pub fn get(&self) -> Settings {
        self.lock().clone()
    }

    /// Apply `update`, validate, persist, and return the new settings.
    ///
    /// Nothing changes, in memory or on disk, when validation fails.
    pub fn update(&self, update: &SettingsUpdate) -> Result<Settings, StoreError> {
        let mut current = self.lock();
        let mut next = current.clone();
        next.merge(update);
        validate_settings(&next)?;
        write_settings(&self.path, &next)?;
        *current = next.clone();
        Ok(next)
    }

    /// Record the start time of this run.
    pub fn touch_last_run(&self, now: DateTime<Utc>) -> Result<Settings, StoreError> {
        self.update(&SettingsUpdate {
            last_run: Some(Some(now)),
            ..Default::default()
        })
    }

    /// Re-read the file, replacing the in-memory copy.
    pub fn reload(&self) -> Result<Settings, StoreError> {
        let settings = read_settings(&self.path)?;
        *self.lock() = settings.clone();
        Ok(settings)
    }

    /// Current settings rendered as YAML.
    pub fn to_yaml(&self) -> Result<String, StoreError> {
        serde_yaml::to_string(&*self.lock()).map_err(StoreError::Serialize)
    }

    fn lock(&self) -> MutexGuard<'_, Settings> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_settings(path: &Path) -> Result<Settings, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings =
        serde_yaml::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate_settings(&settings)?;
    Ok(settings)
}

fn write_settings(path: &Path, settings: &Settings) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let yaml = serde_yaml::to_string(settings).map_err(StoreError::Serialize)?;
    fs::write(path, yaml).map_err(io_err)
}
