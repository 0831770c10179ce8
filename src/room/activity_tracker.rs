use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::models::RoomId;
use crate::event::EventBusClient;

/// Service for keeping a room's `last_activity_ms` fresh on the bus
pub struct ActivityTracker {
    bus: Arc<dyn EventBusClient>,
}

impl ActivityTracker {
    pub fn new(bus: Arc<dyn EventBusClient>) -> Self {
        Self { bus }
    }

    /// Records activity in a room; failures are logged, never raised
    #[instrument(skip(self))]
    pub async fn record_activity(&self, room_id: &RoomId) {
        debug!(room_id = %room_id, "Recording room activity");
        if let Err(e) = self.bus.touch_activity(room_id).await {
            warn!(room_id = %room_id, error = %e, "Failed to record room activity");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{InMemoryEventBus, RoomMetadata};

    #[tokio::test]
    async fn test_record_activity_updates_timestamp() {
        let bus = Arc::new(InMemoryEventBus::new());
        let tracker = ActivityTracker::new(bus.clone());
        let room_id = RoomId::parse("AB3K").unwrap();
        bus.create_room(&room_id, RoomMetadata::new(0)).await.unwrap();

        tracker.record_activity(&room_id).await;

        let metadata = bus.metadata(&room_id).await.unwrap();
        assert!(metadata.last_activity_ms > 0);
        assert_eq!(metadata.created_at_ms, 0);
    }

    #[tokio::test]
    async fn test_record_activity_nonexistent_room_is_harmless() {
        let bus = Arc::new(InMemoryEventBus::new());
        let tracker = ActivityTracker::new(bus.clone());
        let room_id = RoomId::parse("ZZZZ").unwrap();

        tracker.record_activity(&room_id).await;

        assert!(bus.metadata(&room_id).await.is_none());
    }
}
