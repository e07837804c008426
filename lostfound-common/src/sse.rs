//! Server-Sent Events (SSE) utilities
//!
//! Turns an EventBus subscription into an axum SSE response.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::events::{EventBus, LostFoundEvent};

/// Interval between keep-alive comments on idle streams
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Convert a domain event into an SSE frame
///
/// Returns `None` if the record cannot be serialized.
pub fn to_sse_event(event: &LostFoundEvent) -> Option<Event> {
    match Event::default()
        .event(event.event_type())
        .id(uuid::Uuid::new_v4().to_string())
        .json_data(event)
    {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!("SSE: Failed to serialize event {}: {}", event.event_type(), e);
            None
        }
    }
}

/// Create an SSE stream that forwards every EventBus event to one client
///
/// The client is registered as a subscriber when this is called and
/// unregistered when the response stream is dropped (disconnect). The
/// first frame is a `connectionStatus` event; afterwards every published
/// event is forwarded in order. Events missed due to lag are skipped.
///
/// # Arguments
/// * `event_bus` - Bus to subscribe to
/// * `service_name` - Name of the service for logging
pub fn create_event_sse_stream(
    event_bus: &EventBus,
    service_name: &'static str,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = event_bus.subscribe();
    info!(
        "New SSE client connected to {} events, total clients: {}",
        service_name,
        event_bus.subscriber_count()
    );

    let stream = async_stream::stream! {
        yield Ok(Event::default()
            .event("connectionStatus")
            .data("connected"));

        loop {
            match rx.recv().await {
                Ok(event) => {
                    debug!("SSE: Forwarding {} for {}", event.event_type(), event.record_id());
                    if let Some(frame) = to_sse_event(&event) {
                        yield Ok(frame);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("SSE: Client lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => {
                    info!("SSE: {} event bus closed, ending stream", service_name);
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("heartbeat"),
    )
}
