#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod completer;
pub mod dispatcher;
pub mod highlight;
pub mod output;
pub mod paths;
pub mod settings;
pub mod store;
pub mod tokenizer;
pub mod tree;

// Re-export commonly used types for convenience
pub use completer::{Completer, Completion};
pub use dispatcher::{DispatchError, Dispatcher, HELP_TOKEN, Outcome, Resolution};
pub use highlight::{CodeHighlighter, HighlightError, highlight_code_blocks};
pub use output::{CaptureWriter, OutputCapture, erase_lines};
pub use settings::{
    DEFAULT_LOG_FILENAME, DEFAULT_PROMPT, Settings, SettingsError, SettingsUpdate,
    validate_settings,
};
pub use store::{SettingsStore, StoreError};
pub use tokenizer::{TokenCache, TokenizeError, split};
pub use tree::{
    Branch, CommandMap, CommandTree, Handler, HandlerFn, HandlerResult, Node, NodeMeta,
    render_help, render_tree_help,
};

// Re-export path utilities
pub use paths::{PathError, config_path, data_root, ensure_directory, history_file, resolve_dir};
