use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::{borrow::Cow, convert::Infallible, time::Duration};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Typed SSE broadcaster built on `tokio::sync::broadcast`.
///
/// The channel is bounded: a lagging subscriber loses the oldest messages and
/// keeps receiving from where the buffer resumes.
#[derive(Clone)]
pub struct SseBroadcaster<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> SseBroadcaster<T> {
    /// Create a broadcaster with bounded buffer capacity (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Broadcast to current subscribers. Having none is not an error.
    pub fn send(&self, value: T) {
        let _ = self.tx.send(value);
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Typed stream of messages; lag errors are skipped.
    pub fn subscribe_stream(&self) -> impl Stream<Item = T> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|res| async move { res.ok() })
    }

    /// SSE response with JSON payloads and a constant `event:` name, plus
    /// periodic keepalive comments.
    pub fn sse_response_named(
        &self,
        event_name: impl Into<Cow<'static, str>>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
    where
        T: Serialize,
    {
        let event_name = event_name.into();
        let stream = self.subscribe_stream().map(move |msg| {
            let ev = Event::default()
                .event(event_name.as_ref())
                .json_data(&msg)
                .unwrap_or_else(|_| {
                    Event::default()
                        .event(event_name.as_ref())
                        .data("serialization_error")
                });
            Ok(ev)
        });
        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(KEEPALIVE_INTERVAL)
                .text("keepalive"),
        )
    }
}
