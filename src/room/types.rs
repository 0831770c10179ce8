use serde::{Deserialize, Serialize};

/// Request payload for joining a room by its code
#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    pub room_id: String,
}

/// Response for room creation and joining
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomResponse {
    pub success: bool,
    pub room_id: String,
}

/// Response describing the session's current room, if any
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentRoomResponse {
    pub room_id: Option<String>,
    pub joined_at_ms: Option<i64>,
    pub attached_players: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaveRoomResponse {
    pub success: bool,
}
