//! Where settings, logs and history live under the data root.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::error::PathError;
use super::platform::normalize_user_path;

/// Settings file name inside the data root.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log directory used when none is configured, relative to the data root.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// History directory used when none is configured, relative to the data root.
pub const DEFAULT_HISTORY_DIR: &str = "history";

/// Hex characters of the digest kept in history file names.
const DIGEST_LEN: usize = 16;

/// Location of the YAML settings file under `root`.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Resolve a configured directory.
///
/// Absolute and `~`-prefixed values are taken as given; other values are
/// relative to `root`. A missing or blank value falls back to
/// `root/fallback`.
pub fn resolve_dir(
    root: &Path,
    configured: Option<&str>,
    fallback: &str,
) -> Result<PathBuf, PathError> {
    let Some(raw) = configured.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(root.join(fallback));
    };

    if raw.starts_with('~') || Path::new(raw).is_absolute() {
        normalize_user_path(raw)
    } else {
        Ok(root.join(raw))
    }
}

/// Stable digest identifying one REPL by its prompt and default handler.
pub fn history_digest(prompt: &str, default_handler: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    hasher.update([0u8]);
    hasher.update(default_handler.unwrap_or_default().as_bytes());

    let mut hex = String::with_capacity(DIGEST_LEN);
    for byte in hasher.finalize().iter().take(DIGEST_LEN / 2) {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// History file for a REPL, so nested REPLs keep separate histories.
pub fn history_file(dir: &Path, prompt: &str, default_handler: Option<&str>) -> PathBuf {
    dir.join(format!("{}.txt", history_digest(prompt, default_handler)))
}
