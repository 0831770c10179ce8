use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;
use crate::{auth, room, sync};

/// Control surface for one watch session
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(|| async { "pong" }))
        .route("/rooms", post(room::create_room))
        .route("/rooms/join", post(room::join_room))
        .route("/rooms/leave", post(room::leave_room))
        .route("/rooms/current", get(room::current_room))
        .route("/broadcast", post(sync::broadcast))
        .route("/sync", post(sync::sync_now))
        .route("/player", get(sync::player_status))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/auth/me", get(auth::current_user))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::TestApp;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_ping() {
        let app = TestApp::new("AB3K").await;

        let request = Request::builder().uri("/ping").body(Body::empty()).unwrap();
        let response = build_router(app.state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"pong");
    }
}
