use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use contracts::shared::events::{ChangeAction, ChangeEvent, CHANGE_EVENT_NAME};
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;

use crate::shared::events;

/// Коллекция "*" означает: перечитать всё
pub const ALL_ENTITIES: &str = "*";

/// GET /api/events: изменения данных как server-sent events
pub async fn stream() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut receiver = events::bus().subscribe();

    let stream = async_stream::stream! {
        loop {
            let change = match receiver.recv().await {
                Ok(change) => change,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("SSE subscriber lagged by {} events", skipped);
                    ChangeEvent::new(ALL_ENTITIES, None, ChangeAction::Updated)
                }
                Err(RecvError::Closed) => break,
            };
            match Event::default().event(CHANGE_EVENT_NAME).json_data(&change) {
                Ok(event) => yield Ok(event),
                Err(e) => tracing::warn!("Failed to serialize change event: {}", e),
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
