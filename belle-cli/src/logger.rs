//! Logging Infrastructure
//!
//! Human-readable stderr output always; a daily-rolling JSON file when a
//! log directory is given.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn default_filter() -> EnvFilter {
    if cfg!(debug_assertions) {
        EnvFilter::new("info,belle_client=debug,belle_cli=debug")
    } else {
        EnvFilter::new("warn,belle_client=info")
    }
}

/// Initialize the logger. `RUST_LOG` overrides the default filter.
///
/// Keep the returned guard alive until exit so buffered file output is flushed.
pub fn init_logger(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(rolling::daily(dir, "belle.log"));
    let file_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_line_number(true)
        .with_writer(non_blocking_file);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::debug!(path = %dir.display(), "File logging enabled");
    Ok(Some(guard))
}
