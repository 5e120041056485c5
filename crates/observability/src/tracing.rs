//! Structured logging for the storefront services.
//!
//! Emits JSON lines so catalog and resolution events can be correlated
//! downstream by product or catalog id fields.

use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Calling this more
/// than once is harmless; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
