//! Logging Infrastructure
//!
//! Structured logging setup for applications embedding the connector.

use tracing_subscriber::EnvFilter;

/// Initialize the logger (`RUST_LOG` wins, `info` otherwise)
pub fn init_logger() {
    init_logger_with_level(None);
}

/// Initialize the logger with an explicit default level
pub fn init_logger_with_level(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second initialization is a no-op, not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init();
}
