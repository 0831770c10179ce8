use async_trait::async_trait;
use thiserror::Error;

use super::events::BusEvent;
use crate::room::RoomId;

/// Errors that can occur when handling room events
#[derive(Debug, Error)]
pub enum RoomEventError {
    #[error("Handler timed out")]
    Timeout,

    #[error("Handler error: {0}")]
    HandlerError(String),
}

/// Trait for components that react to a room's bus deliveries
///
/// One handler instance typically stands for one player instance (a tab or
/// frame) watching the shared content.
#[async_trait]
pub trait RoomEventHandler: Send + Sync {
    /// Handle one delivered entry of the room log
    ///
    /// Delivery is at-least-once, so handlers must tolerate seeing the same
    /// entry more than once.
    async fn handle_room_event(&self, event: BusEvent) -> Result<(), RoomEventError>;

    /// Called after the session has left `room_id`; drop any room-scoped state
    async fn on_room_left(&self, _room_id: &RoomId) {}

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str;
}
