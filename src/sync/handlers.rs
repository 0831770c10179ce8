use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::state::LocalOutcome;
use super::types::{BroadcastRequest, PlayerStatusResponse};
use crate::event::PlaybackKind;
use crate::player::PlayerNotification;
use crate::shared::{AppError, AppState};

/// HTTP handler for publishing a local playback action to the current room
///
/// POST /broadcast
/// Goes through the same guards as a player notification; `sync` rebroadcasts
/// the player's current snapshot instead of the given position.
#[instrument(name = "broadcast", skip(state))]
pub async fn broadcast(
    State(state): State<AppState>,
    Json(request): Json<BroadcastRequest>,
) -> Result<Json<LocalOutcome>, AppError> {
    let kind: PlaybackKind = request
        .kind
        .parse()
        .map_err(|_| AppError::InvalidRequest(format!("unknown playback type '{}'", request.kind)))?;

    let outcome = match PlayerNotification::from_kind(kind, request.position_seconds) {
        Some(notification) => state.engine.on_local_player_event(notification).await,
        None => state.engine.sync_now().await,
    };

    outcome_response(outcome)
}

/// POST /sync
#[instrument(name = "sync_now", skip(state))]
pub async fn sync_now(State(state): State<AppState>) -> Result<Json<LocalOutcome>, AppError> {
    info!("Manual sync requested");
    outcome_response(state.engine.sync_now().await)
}

/// GET /player
#[instrument(name = "player_status", skip(state))]
pub async fn player_status(State(state): State<AppState>) -> Json<PlayerStatusResponse> {
    Json(PlayerStatusResponse::new(
        state.player.snapshot().await,
        state.engine.apply_state().await,
        state.engine.origin_id(),
        state.engine.pending_echoes().await,
    ))
}

fn outcome_response(outcome: LocalOutcome) -> Result<Json<LocalOutcome>, AppError> {
    match outcome {
        LocalOutcome::NotInRoom => Err(AppError::NotInRoom),
        other => Ok(Json(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerAdapter;
    use crate::shared::test_utils::TestApp;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt; // for `oneshot`

    fn router(app: &TestApp) -> Router {
        Router::new()
            .route("/broadcast", post(broadcast))
            .route("/sync", post(sync_now))
            .route("/player", get(player_status))
            .with_state(app.state.clone())
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_broadcast_outside_room_is_conflict() {
        let app = TestApp::new("AB3K").await;

        let response = router(&app)
            .oneshot(json_post(
                "/broadcast",
                r#"{"type": "play", "position_seconds": 3.0}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_broadcast_publishes_to_current_room() {
        let app = TestApp::new("AB3K").await;
        let room_id = app.state.room_manager.create_room().await.unwrap();

        let response = router(&app)
            .oneshot(json_post(
                "/broadcast",
                r#"{"type": "SEEK", "position_seconds": 42.0}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["outcome"], "published");

        let events = app.bus.events(&room_id).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.position_seconds, 42.0);
        assert_eq!(events[0].event.origin_id, app.state.engine.origin_id());
    }

    #[tokio::test]
    async fn test_broadcast_unknown_type_is_rejected() {
        let app = TestApp::new("AB3K").await;
        app.state.room_manager.create_room().await.unwrap();

        let response = router(&app)
            .oneshot(json_post("/broadcast", r#"{"type": "rewind"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sync_rebroadcasts_player_snapshot() {
        let app = TestApp::new("AB3K").await;
        let room_id = app.state.room_manager.create_room().await.unwrap();
        app.player.seek(30.0).await.unwrap();
        app.player.play().await.unwrap();

        let response = router(&app)
            .oneshot(json_post("/sync", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let events = app.bus.events(&room_id).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.position_seconds, 30.0);
        assert_eq!(events[0].event.should_play, Some(true));
    }

    #[tokio::test]
    async fn test_player_status_reports_idle_engine() {
        let app = TestApp::new("AB3K").await;

        let request = Request::builder()
            .uri("/player")
            .body(Body::empty())
            .unwrap();
        let response = router(&app).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["apply_state"], "idle");
        assert_eq!(json["paused"], true);
        assert_eq!(json["pending_echoes"], 0);
    }
}
