//! Platform-specific path resolution.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "MADIA_DATA_DIR";

/// Directory holding settings, logs and history.
///
/// `MADIA_DATA_DIR` wins when set; otherwise `madia` under the platform's
/// local data directory (e.g. `~/.local/share/madia`). Nothing is created.
pub fn data_root() -> Result<PathBuf, PathError> {
    match env::var(DATA_DIR_ENV) {
        Ok(path) if !path.trim().is_empty() => normalize_user_path(&path),
        _ => dirs::data_local_dir()
            .map(|dir| dir.join("madia"))
            .ok_or(PathError::NoDataDir),
    }
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::tempdir;

    static DATA_DIR_LOCK: Mutex<()> = Mutex::new(());

    /// Holds `MADIA_DATA_DIR` at a test value until dropped.
    struct DataDirOverride {
        previous: Option<String>,
        _lock: MutexGuard<'static, ()>,
    }

    impl DataDirOverride {
        #[allow(unsafe_code)]
        fn new(value: &str) -> Self {
            let lock = DATA_DIR_LOCK
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let previous = env::var(DATA_DIR_ENV).ok();
            // SAFETY: DATA_DIR_LOCK is held, and no other test reads this variable.
            unsafe { env::set_var(DATA_DIR_ENV, value) };
            Self {
                previous,
                _lock: lock,
            }
        }
    }

    impl Drop for DataDirOverride {
        #[allow(unsafe_code)]
        fn drop(&mut self) {
            // SAFETY: the lock is still held until `_lock` drops after this.
            unsafe {
                match &self.previous {
                    Some(value) => env::set_var(DATA_DIR_ENV, value),
                    None => env::remove_var(DATA_DIR_ENV),
                }
            }
        }
    }

    #[test]
    fn test_data_root_honours_env_override() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("nested").join("root");
        let _env = DataDirOverride::new(target.to_string_lossy().as_ref());

        let root = data_root().unwrap();

        assert_eq!(root, target);
        assert!(!root.exists());
    }

    #[test]
    fn test_blank_env_override_falls_back() {
        let _env = DataDirOverride::new("   ");

        if let Ok(root) = data_root() {
            assert!(root.ends_with("madia"));
        }
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(normalize_user_path("   "), Err(PathError::EmptyPath)));
    }

    #[test]
    fn test_normalize_expands_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(normalize_user_path("~").unwrap(), home);
        assert_eq!(normalize_user_path("~/logs").unwrap(), home.join("logs"));
    }

    #[test]
    fn test_normalize_makes_relative_absolute() {
        let path = normalize_user_path("some/dir").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("some/dir"));
    }
}
