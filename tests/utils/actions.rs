#![allow(dead_code)] // Test utilities may not all be used in every test

use tokio::time::{sleep, Duration};

use watchsync::{
    event::OriginId, EventBusClient, LocalOutcome, PlaybackEvent, PlaybackKind,
    PlayerNotification, RoomId,
};

use super::setup::{Peer, TestSetup};

// ============================================================================
// Action Helpers
// ============================================================================

/// Let deliveries and notification pumps run to completion
pub async fn settle() {
    sleep(Duration::from_millis(10)).await;
}

impl Peer {
    pub async fn create_room(&self) -> RoomId {
        let room_id = self.manager.create_room().await.unwrap();
        settle().await;
        room_id
    }

    pub async fn join(&self, code: &str) -> RoomId {
        let room_id = self.manager.join_room(code).await.unwrap();
        settle().await;
        room_id
    }

    pub async fn leave(&self) {
        self.manager.leave_room().await.unwrap();
        settle().await;
    }

    /// Hand a settled player notification straight to the engine
    pub async fn report(&self, notification: PlayerNotification) -> LocalOutcome {
        let outcome = self.engine.on_local_player_event(notification).await;
        settle().await;
        outcome
    }

    /// Viewer presses play
    pub async fn press_play(&self) {
        self.player.user_play().await;
        settle().await;
    }

    pub async fn press_pause(&self) {
        self.player.user_pause().await;
        settle().await;
    }

    pub async fn scrub_to(&self, position_seconds: f64) {
        self.player.user_seek(position_seconds).await;
        settle().await;
    }
}

impl TestSetup {
    /// Publish as a peer that is not part of this setup
    pub async fn publish_foreign(
        &self,
        room_id: &RoomId,
        kind: PlaybackKind,
        position_seconds: f64,
    ) -> u64 {
        let event = PlaybackEvent::new(
            kind,
            position_seconds,
            OriginId::new(),
            chrono::Utc::now().timestamp_millis(),
        );
        let event_id = self.bus.publish(room_id, event).await.unwrap();
        settle().await;
        event_id
    }

    pub async fn redeliver(&self, room_id: &RoomId, event_id: u64) {
        self.bus.redeliver(room_id, event_id).await.unwrap();
        settle().await;
    }
}
