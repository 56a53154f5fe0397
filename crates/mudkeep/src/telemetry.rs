//! Tracing subscriber setup for binaries and tests.

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber.
///
/// Filtering comes from `RUST_LOG` when set, defaulting to `info`.
/// Safe to call more than once — a second installation attempt is
/// ignored, which keeps this usable from individual tests.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
