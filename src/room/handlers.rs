use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::types::{CurrentRoomResponse, JoinRoomRequest, LeaveRoomResponse, RoomResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new room
///
/// POST /rooms
/// Returns the generated room code; the session is now in that room
#[instrument(name = "create_room", skip(state))]
pub async fn create_room(State(state): State<AppState>) -> Result<Json<RoomResponse>, AppError> {
    info!("Creating new room");

    let room_id = state.room_manager.create_room().await?;

    Ok(Json(RoomResponse {
        success: true,
        room_id: room_id.to_string(),
    }))
}

/// HTTP handler for joining an existing room
///
/// POST /rooms/join
#[instrument(name = "join_room", skip(state))]
pub async fn join_room(
    State(state): State<AppState>,
    Json(request): Json<JoinRoomRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    info!(room_id = %request.room_id, "Joining room");

    let room_id = state.room_manager.join_room(&request.room_id).await?;

    Ok(Json(RoomResponse {
        success: true,
        room_id: room_id.to_string(),
    }))
}

/// HTTP handler for leaving the current room
///
/// POST /rooms/leave
#[instrument(name = "leave_room", skip(state))]
pub async fn leave_room(
    State(state): State<AppState>,
) -> Result<Json<LeaveRoomResponse>, AppError> {
    state.room_manager.leave_room().await?;
    Ok(Json(LeaveRoomResponse { success: true }))
}

/// GET /rooms/current
#[instrument(name = "current_room", skip(state))]
pub async fn current_room(State(state): State<AppState>) -> Json<CurrentRoomResponse> {
    let details = state.room_manager.current_room_details().await;

    Json(CurrentRoomResponse {
        room_id: details.as_ref().map(|(room_id, _)| room_id.to_string()),
        joined_at_ms: details.map(|(_, joined_at_ms)| joined_at_ms),
        attached_players: state.room_manager.attached_players().await,
    })
}
