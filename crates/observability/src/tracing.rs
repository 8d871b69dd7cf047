//! Tracing/logging initialization.
//!
//! The audit trail is structured tracing events from `staffgate_auth`:
//! denials at `warn`, grants at `debug`, role-integrity problems at `error`.
//! The default filter keeps the grant events visible without turning on
//! debug output for the rest of the process.

use tracing_subscriber::EnvFilter;

/// Default level filter; overridable via `RUST_LOG`.
const DEFAULT_FILTER: &str = "info,staffgate_auth=debug";

/// Initialize tracing/logging for the process.
///
/// JSON lines with timestamps and targets, so audit events stay
/// machine-filterable by their `staffgate_auth::*` target. Safe to call
/// multiple times (subsequent calls are no-ops), which keeps test setups
/// simple.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .try_init();
}
