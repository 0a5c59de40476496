//! Logging Infrastructure
//!
//! Console logging by default, daily rolling files when a log directory
//! is configured, JSON lines when asked for.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional file output
///
/// `log_level` accepts a plain level (`debug`) or a full filter directive
/// (`comptoir=debug,redb=warn`). `RUST_LOG` wins when set. A second call
/// keeps the first subscriber.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&Path>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| tracing_appender::rolling::daily(dir, "comptoir"));

    let _ = match (json.unwrap_or(false), file_appender) {
        (true, Some(file)) => subscriber.json().with_writer(file).try_init(),
        (true, None) => subscriber.json().with_writer(std::io::stderr).try_init(),
        (false, Some(file)) => subscriber.with_ansi(false).with_writer(file).try_init(),
        (false, None) => subscriber.with_writer(std::io::stderr).try_init(),
    };
}
