use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{activity_tracker::ActivityTracker, models::RoomId};
use crate::event::{EventBusClient, EventId, PlaybackEvent, RoomSubscription};
use crate::shared::AppError;

/// The room a session is currently in, with its live subscription
pub struct ActiveRoom {
    pub room_id: RoomId,
    pub subscription: RoomSubscription,
    pub joined_at_ms: i64,
}

/// Slot holding at most one active room per session
pub type RoomSlot = Arc<RwLock<Option<ActiveRoom>>>;

/// Seam through which player-side code publishes into the current room
#[async_trait]
pub trait RoomBroadcaster: Send + Sync {
    async fn current_room(&self) -> Option<RoomId>;

    /// Publish `event` to the current room, failing with `NotInRoom` when there is none
    async fn broadcast(&self, event: PlaybackEvent) -> Result<EventId, AppError>;
}

/// Broadcaster bound to a session's room slot
pub struct SessionBroadcaster {
    slot: RoomSlot,
    bus: Arc<dyn EventBusClient>,
    activity_tracker: ActivityTracker,
}

impl SessionBroadcaster {
    pub fn new(slot: RoomSlot, bus: Arc<dyn EventBusClient>) -> Self {
        Self {
            slot,
            activity_tracker: ActivityTracker::new(bus.clone()),
            bus,
        }
    }
}

#[async_trait]
impl RoomBroadcaster for SessionBroadcaster {
    async fn current_room(&self) -> Option<RoomId> {
        self.slot
            .read()
            .await
            .as_ref()
            .map(|active| active.room_id.clone())
    }

    #[instrument(skip(self, event), fields(kind = %event.kind))]
    async fn broadcast(&self, event: PlaybackEvent) -> Result<EventId, AppError> {
        let room_id = self.current_room().await.ok_or_else(|| {
            warn!("Broadcast attempted with no active room");
            AppError::NotInRoom
        })?;

        let event_id = self
            .bus
            .publish(&room_id, event)
            .await
            .map_err(|e| AppError::PublishFailed(e.to_string()))?;

        debug!(room_id = %room_id, event_id, "Event broadcast to room");
        self.activity_tracker.record_activity(&room_id).await;

        Ok(event_id)
    }
}
