//! Scoped trace spans with guaranteed close.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, Span, field::Empty};

/// A named trace span around one logical operation.
///
/// The scope records its start time when opened and, when dropped, records the
/// elapsed time on the span and emits the closing record. Because closing
/// happens in `Drop`, the span is flushed on **every** exit path, including
/// early returns, error propagation, and panic unwind.
#[derive(Debug)]
pub struct SpanScope {
    span: Span,
    started_at: Instant,
}

impl SpanScope {
    /// Open a scope for `operation`.
    ///
    /// `operation` lands in the span's `operation` field; observability
    /// tooling keys on it.
    pub fn open(operation: &str) -> Self {
        let span = tracing::info_span!("scope", operation = operation, elapsed_ms = Empty);
        Self {
            span,
            started_at: Instant::now(),
        }
    }

    /// The underlying span, for instrumenting futures or entering manually.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Run `fut` inside a scope named `operation`.
    ///
    /// The scope closes as soon as the future resolves (or is dropped).
    pub async fn run<F>(operation: &str, fut: F) -> F::Output
    where
        F: Future,
    {
        let scope = Self::open(operation);
        let span = scope.span().clone();
        fut.instrument(span).await
    }
}

impl Drop for SpanScope {
    fn drop(&mut self) {
        let elapsed_ms = self.started_at.elapsed().as_millis() as u64;
        self.span.record("elapsed_ms", elapsed_ms);
        tracing::debug!(parent: &self.span, elapsed_ms, "scope closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_passes_through_success_and_failure() {
        let ok: Result<u32, &str> = SpanScope::run("test-op", async { Ok(1) }).await;
        assert_eq!(ok, Ok(1));

        let err: Result<u32, &str> = SpanScope::run("test-op", async { Err("boom") }).await;
        assert_eq!(err, Err("boom"));
    }
}
