//! Logging setup.

use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Filter from `RUST_LOG` when set, otherwise from `--log-level`.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()))
}

/// Install the global fmt subscriber, writing to stderr.
pub fn init(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .init();
}
