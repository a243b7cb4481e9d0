//! Where madia keeps its files.
//!
//! The data root holds `config.yaml` plus the default `logs/` and `history/`
//! directories. Log and history locations can be moved through settings;
//! [`resolve_dir`] interprets those values against the root.

mod ensure;
mod error;
mod layout;
mod platform;

pub use error::PathError;

pub use platform::{DATA_DIR_ENV, data_root, normalize_user_path};

pub use layout::{
    CONFIG_FILE_NAME, DEFAULT_HISTORY_DIR, DEFAULT_LOG_DIR, config_path, history_digest,
    history_file, resolve_dir,
};

pub use ensure::ensure_directory;
