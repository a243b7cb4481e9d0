//! Errors from locating and preparing madia's directories.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// The platform has no per-user data directory and `MADIA_DATA_DIR` is unset.
    #[error("No data directory for this platform; set MADIA_DATA_DIR")]
    NoDataDir,

    #[error("A configured directory is blank")]
    EmptyPath,

    #[error("{} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Creating the directory or writing inside it failed.
    #[error("Cannot {action} {}: {source}", .path.display())]
    Unusable {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}
