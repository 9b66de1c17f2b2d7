use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default log directory, `~/.autoregister/logs`.
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".autoregister/logs")
}

/// Install a global subscriber for hosts that do not bring their own.
///
/// Writes a daily rolling file named after `component` and, optionally,
/// mirrors events to stderr. Keep the returned guard alive to flush the file
/// writer. Fails when a global subscriber is already installed.
pub fn init_logging(
    component: &str,
    log_dir: Option<&Path>,
    to_stderr: bool,
) -> Result<WorkerGuard, TryInitError> {
    let log_dir = log_dir.map(Path::to_path_buf).unwrap_or_else(default_log_dir);
    let _ = std::fs::create_dir_all(&log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).try_init()?;
    } else {
        registry.try_init()?;
    }

    Ok(guard)
}
