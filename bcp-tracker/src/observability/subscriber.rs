//! Installation of the global `tracing` subscriber.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs a `tracing-subscriber` fmt subscriber for the process.
///
/// Returns `false` if a global subscriber was already installed (by an
/// earlier call or by the host), in which case the existing one is kept.
/// An unparsable filter directive falls back to `info`.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}
