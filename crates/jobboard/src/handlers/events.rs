//! SSE push transport for job-board events.
//!
//! Each connection is one event-bus subscriber. Events are sent with the
//! event type as the SSE `event:` name and the `{type, payload}` JSON as data.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};

use jobboard_core::cache::{EventBus, SubscriberId};
use jobboard_core::events::JobBoardEvent;

use crate::context::RequestContext;
use crate::handlers::AppError;
use crate::state::AppState;

/// Unsubscribes when the SSE stream is dropped, e.g. on client disconnect.
struct SubscriptionGuard {
    events: Arc<dyn EventBus>,
    id: SubscriberId,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        let events = Arc::clone(&self.events);
        let id = self.id;
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move { events.unsubscribe(id).await });
        }
    }
}

fn to_sse_event(event: &JobBoardEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(data) => Some(Event::default().event(event.event_type()).data(data)),
        Err(err) => {
            tracing::warn!(event_type = event.event_type(), error = %err, "Failed to encode event");
            None
        }
    }
}

/// GET /api/events - stream of job-board events.
pub async fn events_sse(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    let mut subscription = state.events.subscribe().await?;
    let guard = SubscriptionGuard {
        events: Arc::clone(&state.events),
        id: subscription.id(),
    };
    let mut shutdown_rx = state.subscribe_shutdown();

    tracing::debug!(
        request_id = %ctx.request_id,
        subscriber_id = %guard.id,
        subscribers = state.events.subscriber_count(),
        "SSE client connected"
    );

    let stream = async_stream::stream! {
        let _guard = guard;

        loop {
            tokio::select! {
                next = subscription.recv() => {
                    let Some(event) = next else {
                        tracing::debug!("Event subscription ended");
                        break;
                    };
                    if let Some(sse) = to_sse_event(&event) {
                        yield Ok(sse);
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("SSE session received shutdown signal");
                    break;
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

