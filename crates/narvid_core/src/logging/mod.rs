//! Logging: per-generation job loggers plus global tracing setup.

mod job_logger;
mod types;

pub use job_logger::JobLogger;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a global tracing subscriber writing to stderr and a daily
/// rolling file under `logs_dir`.
///
/// Respects `RUST_LOG`; defaults to `info`. Returns the appender guard,
/// which must be kept alive for the file writer to flush. Safe to call
/// more than once; later calls are no-ops.
pub fn init_tracing(logs_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(logs_dir, "narvid.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(file_writer)
        .with_ansi(false)
        .try_init();

    guard
}
