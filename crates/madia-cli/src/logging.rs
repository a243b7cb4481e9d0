//! Tracing setup: daily-rotated log file plus optional stderr output.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";
const VERBOSE_FILTER: &str = "debug";

/// Initialize the global subscriber.
///
/// Logs go to `<log_dir>/<file_prefix>.<date>`. With `verbose` a compact
/// stderr layer is added. `RUST_LOG` overrides the level either way.
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init_tracing(log_dir: &Path, file_prefix: &str, verbose: bool) -> Option<WorkerGuard> {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!(
            "Warning: could not create log directory {}: {e}",
            log_dir.display()
        );
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, file_prefix);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = verbose.then(|| fmt::layer().with_writer(std::io::stderr).compact());

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .compact(),
        )
        .try_init()
        .ok();

    Some(guard)
}
