use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{
    bus::{BusError, EventBusClient},
    room_handler::RoomEventHandler,
};
use crate::room::RoomId;

/// A live subscription routing one room's new entries to a handler
///
/// Dropping the subscription aborts the routing task; [`RoomSubscription::cancel`]
/// additionally waits until the task is gone, so no handler call can start
/// after it returns.
pub struct RoomSubscription {
    room_id: RoomId,
    task: Option<JoinHandle<()>>,
}

impl RoomSubscription {
    /// Subscribe to `room_id` and spawn the task that feeds `handler`
    pub async fn start(
        bus: &dyn EventBusClient,
        room_id: RoomId,
        handler: Arc<dyn RoomEventHandler>,
    ) -> Result<Self, BusError> {
        let handler_name = handler.handler_name();

        info!(
            room_id = %room_id,
            handler = handler_name,
            "Starting room subscription"
        );

        let mut events = bus.subscribe_new_events(&room_id).await?;
        let task_room_id = room_id.clone();

        let task = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                debug!(
                    room_id = %task_room_id,
                    handler = handler_name,
                    event_id = event.event_id,
                    event_type = event.event_type(),
                    "Received room event"
                );

                if let Err(e) = handler.handle_room_event(event).await {
                    warn!(
                        room_id = %task_room_id,
                        handler = handler_name,
                        error = %e,
                        "Room event handler failed"
                    );
                }
            }

            warn!(
                room_id = %task_room_id,
                handler = handler_name,
                "Room subscription ended - no more events"
            );
        });

        Ok(Self {
            room_id,
            task: Some(task),
        })
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Stop routing events and wait for the routing task to be torn down
    pub async fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // Cancelled is the expected outcome here
            let _ = task.await;
        }
        info!(room_id = %self.room_id, "Room subscription cancelled");
    }
}

impl Drop for RoomSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
