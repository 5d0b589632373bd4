//! Logging setup via tracing; level comes from `RUST_LOG` (default: info).

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber. Call once at startup.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Test-friendly init: verbose, capture-aware, safe to call repeatedly.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
