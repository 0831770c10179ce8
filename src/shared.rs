use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::IdentityProvider;
use crate::player::PlayerAdapter;
use crate::room::RoomSessionManager;
use crate::sync::ReconciliationEngine;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub room_manager: Arc<RoomSessionManager>,
    pub engine: Arc<ReconciliationEngine>,
    pub player: Arc<dyn PlayerAdapter>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        room_manager: Arc<RoomSessionManager>,
        engine: Arc<ReconciliationEngine>,
        player: Arc<dyn PlayerAdapter>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            room_manager,
            engine,
            player,
            identity,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create room: {0}")]
    RoomCreateFailed(String),

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Not connected to any room")]
    NotInRoom,

    #[error("Failed to publish event: {0}")]
    PublishFailed(String),

    #[error("Event bus unavailable: {0}")]
    BusUnavailable(String),

    #[error("Player rejected command: {0}")]
    PlaybackCommandFailed(String),

    #[error("Invalid room code: {0}")]
    InvalidRoomCode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotInRoom => StatusCode::CONFLICT,
            AppError::InvalidRoomCode(_) | AppError::InvalidRequest(_) | AppError::JwtError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RoomCreateFailed(_) | AppError::PublishFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::BusUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::PlaybackCommandFailed(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
