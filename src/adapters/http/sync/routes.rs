//! Axum router configuration for sync hub HTTP endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, issue_token, SyncAppState};

/// Create the sync HTTP router.
///
/// # Routes
///
/// - `POST /api/sync/tokens` - Issue a sync token (issuer key when configured)
/// - `GET /health` - Liveness and connection counts
pub fn sync_router() -> Router<SyncAppState> {
    Router::new()
        .route("/api/sync/tokens", post(issue_token))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::authorization::InMemoryConnectionAuthorizer;
    use crate::adapters::http::sync::dto::{ErrorResponse, HealthResponse, IssueTokenResponse};
    use crate::adapters::http::sync::handlers::ISSUER_KEY_HEADER;
    use crate::adapters::websocket::ConnectionManager;
    use crate::domain::foundation::{ConnectionId, Token};
    use crate::ports::ConnectionAuthorizer;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(
        issuer_key: Option<&str>,
    ) -> (Router, Arc<InMemoryConnectionAuthorizer>, Arc<ConnectionManager>) {
        let registry = Arc::new(InMemoryConnectionAuthorizer::new());
        let connections = Arc::new(ConnectionManager::default());
        let state = SyncAppState {
            authorizer: Some(registry.clone() as Arc<dyn ConnectionAuthorizer>),
            connections: connections.clone(),
            issuer_key: issuer_key.map(|k| SecretString::new(k.to_string())),
        };
        (sync_router().with_state(state), registry, connections)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn token_request(key: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/sync/tokens")
            .header("content-type", "application/json");
        if let Some(key) = key {
            builder = builder.header(ISSUER_KEY_HEADER, key);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn issue_token_returns_usable_token() {
        let (router, registry, _) = app(None);

        let response = router.oneshot(token_request(None, "{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: IssueTokenResponse = body_json(response).await;
        let conn = ConnectionId::new();
        assert!(registry.authorize(&Token::new(body.token), &conn).await.is_ok());
    }

    #[tokio::test]
    async fn issue_token_without_body_is_accepted() {
        let (router, registry, _) = app(None);
        let request = Request::builder()
            .method("POST")
            .uri("/api/sync/tokens")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(registry.issued_count(), 1);
    }

    #[tokio::test]
    async fn issue_token_for_user_records_user() {
        let (router, registry, _) = app(None);

        let response = router
            .oneshot(token_request(None, r#"{"user":"alice"}"#))
            .await
            .unwrap();
        let body: IssueTokenResponse = body_json(response).await;

        let conn = ConnectionId::new();
        let authorized = registry
            .authorize(&Token::new(body.token), &conn)
            .await
            .unwrap();
        assert_eq!(authorized.user.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn issue_token_with_malformed_body_is_bad_request() {
        let (router, registry, _) = app(None);

        let response = router
            .oneshot(token_request(None, r#"{"user": "alice""#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.error_code, "INVALID_REQUEST");
        assert_eq!(registry.issued_count(), 0);
    }

    #[tokio::test]
    async fn issue_token_requires_matching_issuer_key() {
        let (router, registry, _) = app(Some("s3cret"));

        let missing = router
            .clone()
            .oneshot(token_request(None, "{}"))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        let error: ErrorResponse = body_json(missing).await;
        assert_eq!(error.error_code, "AUTHENTICATION_REQUIRED");

        let wrong = router
            .clone()
            .oneshot(token_request(Some("guess"), "{}"))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let ok = router
            .oneshot(token_request(Some("s3cret"), "{}"))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::CREATED);
        assert_eq!(registry.issued_count(), 1);
    }

    #[tokio::test]
    async fn issue_token_when_authorization_disabled_is_not_found() {
        let state = SyncAppState {
            authorizer: None,
            connections: Arc::new(ConnectionManager::default()),
            issuer_key: None,
        };
        let router = sync_router().with_state(state);

        let response = router.oneshot(token_request(None, "{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.error_code, "AUTHORIZATION_DISABLED");
    }

    #[tokio::test]
    async fn health_reports_connection_counts() {
        let (router, registry, connections) = app(None);
        let (id, _rx) = connections.register();
        let (_other, _other_rx) = connections.register();
        let token = registry.issue_token().await;
        registry.authorize(&token, &id).await.unwrap();

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthResponse = body_json(response).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.connections, 2);
        assert_eq!(health.authorized, Some(1));
    }
}
