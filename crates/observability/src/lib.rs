//! Tracing, logging, span scoping (shared setup).

pub mod span_scope;
pub mod tracing;

pub use span_scope::SpanScope;

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
