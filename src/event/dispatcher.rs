use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, error, info};

use super::{
    events::BusEvent,
    room_handler::{RoomEventError, RoomEventHandler},
};
use crate::room::RoomId;

/// Fans one room's deliveries out to every attached player instance
///
/// The dispatcher is itself a [`RoomEventHandler`], so a session needs only one
/// bus subscription no matter how many players watch the content. Handlers
/// run concurrently for a given event, but the next event is only dispatched
/// once every handler is done with the current one, which keeps per-handler
/// delivery in append order. A slow or failing handler never affects the others.
pub struct EventDispatcher {
    handlers: RwLock<Vec<Arc<dyn RoomEventHandler>>>,
    handler_timeout: Duration,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            handler_timeout: Duration::from_secs(5),
        }
    }

    /// Set the timeout for individual handler execution
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Add an event handler to the dispatcher
    pub async fn add_handler(&self, handler: Arc<dyn RoomEventHandler>) {
        info!(handler_name = handler.handler_name(), "Registering room event handler");
        self.handlers.write().await.push(handler);
    }

    pub async fn handler_count(&self) -> usize {
        self.handlers.read().await.len()
    }

    async fn snapshot(&self) -> Vec<Arc<dyn RoomEventHandler>> {
        self.handlers.read().await.clone()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomEventHandler for EventDispatcher {
    async fn handle_room_event(&self, event: BusEvent) -> Result<(), RoomEventError> {
        let handlers = self.snapshot().await;

        debug!(
            event_type = event.event_type(),
            room_id = %event.room_id,
            "Dispatching event to {} handlers",
            handlers.len()
        );

        let deliveries = handlers.iter().map(|handler| {
            let event = event.clone();
            let handler_timeout = self.handler_timeout;
            async move {
                let handler_name = handler.handler_name();
                match timeout(handler_timeout, handler.handle_room_event(event)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        error!(handler = handler_name, error = %e, "Handler failed");
                    }
                    Err(_) => {
                        error!(
                            handler = handler_name,
                            error = %RoomEventError::Timeout,
                            "Handler timed out"
                        );
                    }
                }
            }
        });

        join_all(deliveries).await;
        Ok(())
    }

    async fn on_room_left(&self, room_id: &RoomId) {
        for handler in self.snapshot().await {
            handler.on_room_left(room_id).await;
        }
    }

    fn handler_name(&self) -> &'static str {
        "EventDispatcher"
    }
}
