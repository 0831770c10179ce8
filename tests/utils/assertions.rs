//! Test assertion helpers
#![allow(dead_code)] // Test utilities may not all be used in every test

use watchsync::{event::BusEvent, PlaybackKind, RoomId};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

impl TestSetup {
    pub async fn room_log(&self, room_id: &RoomId) -> Vec<BusEvent> {
        self.bus.events(room_id).await
    }

    /// Assert the room's log holds exactly these kinds, in order
    pub async fn assert_room_log(&self, room_id: &RoomId, expected: &[PlaybackKind]) {
        let kinds: Vec<PlaybackKind> = self
            .room_log(room_id)
            .await
            .iter()
            .map(|entry| entry.event.kind)
            .collect();
        assert_eq!(kinds, expected, "unexpected events in room {}", room_id);
    }

    pub async fn assert_subscribers(&self, room_id: &RoomId, expected: usize) {
        assert_eq!(
            self.bus.subscriber_count(room_id).await,
            expected,
            "unexpected subscriber count for room {}",
            room_id
        );
    }
}
