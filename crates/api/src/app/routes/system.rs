//! Health and operational visibility endpoints.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event as SseEvent, KeepAlive, Sse},
    },
};
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /stream
///
/// Real-time SSE feed of placement events for dashboards and debugging.
/// Each message carries the envelope metadata plus the order id; heartbeats
/// keep idle connections alive.
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let subscription = services.subscribe_order_events();

    // Forward bus messages (sync mpsc) into an async channel the SSE body
    // can stream from.
    let (tx, rx) = unbounded_channel::<Result<SseEvent, std::convert::Infallible>>();

    tokio::task::spawn_blocking(move || {
        let mut last_heartbeat = Instant::now();

        loop {
            match subscription.recv_timeout(Duration::from_millis(1000)) {
                Ok(envelope) => {
                    let data = serde_json::json!({
                        "event_id": envelope.event_id().to_string(),
                        "topic": envelope.topic(),
                        "order_id": envelope.payload().order_id.to_string(),
                        "occurred_at": envelope.payload().occurred_at.to_rfc3339(),
                    });

                    let json_str = match serde_json::to_string(&data) {
                        Ok(s) => s,
                        Err(_) => continue,
                    };

                    if tx.send(Ok(SseEvent::default().event("event").data(json_str))).is_err() {
                        break; // Receiver dropped
                    }

                    last_heartbeat = Instant::now();
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                    if last_heartbeat.elapsed() > Duration::from_secs(15) {
                        let heartbeat = SseEvent::default().event("heartbeat").data("{}");
                        if tx.send(Ok(heartbeat)).is_err() {
                            break;
                        }
                        last_heartbeat = Instant::now();
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    break; // Bus closed
                }
            }
        }
    });

    let stream = UnboundedReceiverStream::new(rx);
    Sse::new(stream)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
        .into_response()
}
