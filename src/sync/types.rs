use serde::{Deserialize, Serialize};

use super::state::ApplyState;
use crate::event::OriginId;
use crate::player::PlayerSnapshot;

/// Request payload for broadcasting a local playback action
#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    /// Playback kind, case-insensitive
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position_seconds: f64,
}

/// Player state as seen by this session's reconciliation engine
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerStatusResponse {
    #[serde(flatten)]
    pub snapshot: PlayerSnapshot,
    pub apply_state: String,
    pub origin_id: OriginId,
    pub pending_echoes: usize,
}

impl PlayerStatusResponse {
    pub fn new(
        snapshot: PlayerSnapshot,
        apply_state: ApplyState,
        origin_id: OriginId,
        pending_echoes: usize,
    ) -> Self {
        Self {
            snapshot,
            apply_state: apply_state.to_string(),
            origin_id,
            pending_echoes,
        }
    }
}
