//! Server-Sent Events (SSE) for live item/claim updates

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use std::convert::Infallible;

use crate::AppState;

/// Build event stream routes
pub fn event_routes() -> Router<AppState> {
    Router::new().route("/api/events", get(event_stream))
}

/// GET /api/events - SSE event stream
///
/// Streams events:
/// - connectionStatus (once, on connect)
/// - itemAdded, itemUpdated, claimAdded, claimUpdated
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    lostfound_common::sse::create_event_sse_stream(state.coordinator.event_bus(), "lostfound-api")
}
