use axum::{extract::State, http::HeaderMap, Json};
use tracing::{info, instrument, warn};

use super::{
    models::{Principal, SignInMethod},
    types::{SignInResponse, SignOutResponse},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for signing in
///
/// POST /auth/sign-in
/// Returns a JWT token for the new principal
#[instrument(name = "sign_in", skip(state, method))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(method): Json<SignInMethod>,
) -> Result<Json<SignInResponse>, AppError> {
    let signed_in = state.identity.sign_in(method).await?;

    info!(uid = %signed_in.principal.uid, "Sign-in succeeded");

    Ok(Json(SignInResponse {
        token: signed_in.token,
        principal: signed_in.principal,
    }))
}

/// POST /auth/sign-out
#[instrument(name = "sign_out", skip(state))]
pub async fn sign_out(State(state): State<AppState>) -> Result<Json<SignOutResponse>, AppError> {
    state.identity.sign_out().await?;
    Ok(Json(SignOutResponse { success: true }))
}

/// HTTP handler returning the principal behind the bearer token
///
/// GET /auth/me
#[instrument(name = "current_user", skip(state, headers))]
pub async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Principal>, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let principal = state.identity.authenticate(token).await?;
    Ok(Json(principal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::TestApp;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn router(app: &TestApp) -> Router {
        Router::new()
            .route("/auth/sign-in", post(sign_in))
            .route("/auth/sign-out", post(sign_out))
            .route("/auth/me", get(current_user))
            .with_state(app.state.clone())
    }

    fn me_request(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/auth/me");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn sign_in_anonymously(app: &TestApp) -> SignInResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/sign-in")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"method": "anonymous"}"#))
            .unwrap();

        let response = router(app).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_then_me() {
        let app = TestApp::new("AB3K").await;
        let signed_in = sign_in_anonymously(&app).await;

        assert!(signed_in.principal.is_anonymous);
        assert_eq!(signed_in.principal.display_name.split(' ').count(), 2);

        let response = router(&app)
            .oneshot(me_request(Some(&signed_in.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let principal: Principal = serde_json::from_slice(&body).unwrap();
        assert_eq!(principal.uid, signed_in.principal.uid);
    }

    #[tokio::test]
    async fn test_me_without_token_is_unauthorized() {
        let app = TestApp::new("AB3K").await;

        let response = router(&app).oneshot(me_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_after_sign_out_is_unauthorized() {
        let app = TestApp::new("AB3K").await;
        let signed_in = sign_in_anonymously(&app).await;

        let request = Request::builder()
            .method("POST")
            .uri("/auth/sign-out")
            .body(Body::empty())
            .unwrap();
        let response = router(&app).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router(&app)
            .oneshot(me_request(Some(&signed_in.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
