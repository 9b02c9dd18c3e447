//! Shared setup for the demo binaries.

use tracing_subscriber::EnvFilter;

/// Installs a stderr log subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Logs go to stderr so demo output on stdout stays clean.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
