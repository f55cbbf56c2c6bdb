use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const SERVER_FILTER: &str = "taskflow=info,tower_http=info";
const TUI_FILTER: &str = "taskflow=debug";

/// Stderr logging for `taskflow serve` and the one-shot commands.
/// `RUST_LOG` overrides the default filter.
pub fn init_stderr() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(SERVER_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// File logging for the TUI, which owns the terminal. Does nothing unless
/// `TASKFLOW_LOG_DIR` is set; returns the log path when enabled.
pub fn init_tui() -> Option<PathBuf> {
    let log_dir = std::env::var("TASKFLOW_LOG_DIR").ok().map(PathBuf::from)?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let log_path = log_dir.join(format!("taskflow.{}.log", std::process::id()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(TUI_FILTER));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok()?;

    tracing::info!(path = ?log_path, "tui tracing initialized");
    Some(log_path)
}
