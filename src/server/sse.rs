//! Server-Sent Events handler for live dashboard updates.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};

use crate::server::state::AppState;

/// GET /events - long-lived push stream of ticket events.
///
/// Each ticket create/update/delete arrives as one `data:` frame holding
/// the serialized event. Connections are held open indefinitely; when the
/// client goes away the stream is dropped and the subscription
/// deregisters itself from the hub.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.hub.subscribe();

    let stream = stream::unfold(subscription, |mut sub| async move {
        loop {
            // None means the hub is gone, which ends the stream.
            let event = sub.recv().await?;
            match serde_json::to_string(&event) {
                Ok(json) => return Some((Ok(Event::default().data(json)), sub)),
                Err(e) => {
                    // Skip the frame rather than tear the connection down.
                    tracing::error!(error = %e, "Failed to serialize ticket event");
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
