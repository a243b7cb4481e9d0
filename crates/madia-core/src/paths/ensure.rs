//! Making sure the data, log and history directories can be used.

use std::fs;
use std::path::Path;

use super::error::PathError;

/// Name of the scratch file written to check that a directory accepts writes.
const WRITE_CHECK_FILE: &str = ".madia_write_test";

/// Create `path` if needed and check that files can be written inside it.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() && !path.is_dir() {
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }

    fs::create_dir_all(path).map_err(|source| PathError::Unusable {
        action: "create",
        path: path.to_path_buf(),
        source,
    })?;

    let check = path.join(WRITE_CHECK_FILE);
    fs::write(&check, b"ok").map_err(|source| PathError::Unusable {
        action: "write to",
        path: path.to_path_buf(),
        source,
    })?;
    let _ = fs::remove_file(&check);

    tracing::debug!(path = %path.display(), "directory ready");
    Ok(())
}
