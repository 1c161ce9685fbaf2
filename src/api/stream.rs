//! Live order event stream
//!
//! GET /api/stream - long-lived SSE connection (public)
//!
//! The response is `text/event-stream` with caching disabled and the
//! connection kept alive. The first frame is a `retry:` reconnect hint; each
//! published order event follows as `event: <name>` plus a JSON `data:` line.
//! Events are wake-up signals only - clients re-fetch from the REST API.

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::{Extension, Router};
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;

use vitrin_core::{EventHub, OrderEvent};

use crate::server::config::StreamConfig;

/// Resolved SSE settings, injected as a router extension
#[derive(Debug, Clone, Copy)]
pub struct StreamSettings {
    /// Client reconnect hint
    pub retry: Duration,
    /// Idle keep-alive comment interval
    pub keep_alive: Duration,
}

impl From<&StreamConfig> for StreamSettings {
    fn from(config: &StreamConfig) -> Self {
        Self {
            retry: Duration::from_millis(config.retry_ms),
            keep_alive: Duration::from_secs(config.keep_alive_secs),
        }
    }
}

fn sse_event(event: &OrderEvent) -> Event {
    Event::default()
        .event(event.name())
        .data(event.payload().to_string())
}

/// Open a subscriber connection.
///
/// The hub subscription lives inside the response stream: when the client
/// disconnects, axum drops the stream and the connection unregisters itself.
async fn subscribe(
    Extension(hub): Extension<EventHub>,
    Extension(settings): Extension<StreamSettings>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = hub.subscribe();

    let retry_hint =
        stream::once(async move { Ok::<_, Infallible>(Event::default().retry(settings.retry)) });
    let events = subscription.map(|event| Ok::<_, Infallible>(sse_event(&event)));

    Sse::new(retry_hint.chain(events))
        .keep_alive(KeepAlive::new().interval(settings.keep_alive))
}

/// Create stream routes
pub fn stream_routes() -> Router {
    Router::new().route("/api/stream", get(subscribe))
}
