//! Tracing, logging, metrics (shared setup).
//!
//! The audit trail for authorization decisions rides on `tracing`; this
//! crate only wires up the subscriber.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
