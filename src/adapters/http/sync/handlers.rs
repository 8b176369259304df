//! HTTP handlers for sync hub endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::adapters::websocket::ConnectionManager;
use crate::domain::foundation::ErrorCode;
use crate::ports::ConnectionAuthorizer;

use super::dto::{ErrorResponse, HealthResponse, IssueTokenRequest, IssueTokenResponse};

/// Header carrying the shared key that allows token issuance.
pub const ISSUER_KEY_HEADER: &str = "X-Sync-Issuer-Key";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the sync HTTP endpoints.
#[derive(Clone)]
pub struct SyncAppState {
    /// Registry that issues tokens; `None` when authorization is disabled.
    pub authorizer: Option<Arc<dyn ConnectionAuthorizer>>,
    pub connections: Arc<ConnectionManager>,
    /// Key the login flow must present to issue tokens.
    pub issuer_key: Option<SecretString>,
}

impl SyncAppState {
    /// Whether the request carries the configured issuer key.
    ///
    /// Always true when no key is configured.
    fn issuer_key_matches(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.issuer_key else {
            return true;
        };

        headers
            .get(ISSUER_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|provided| {
                provided
                    .as_bytes()
                    .ct_eq(expected.expose_secret().as_bytes())
                    .into()
            })
            .unwrap_or(false)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/sync/tokens - Issue a token for a later sync connection
pub async fn issue_token(
    State(state): State<SyncAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, SyncApiError> {
    if !state.issuer_key_matches(&headers) {
        tracing::warn!("Rejected token issuance with missing or wrong issuer key");
        return Err(SyncApiError::IssuerKeyRequired);
    }

    let authorizer = state
        .authorizer
        .as_ref()
        .ok_or(SyncApiError::AuthorizationDisabled)?;

    let request = parse_issue_request(&body)?;
    let token = match request.user.as_deref() {
        Some(user) => authorizer.issue_token_for(user).await,
        None => authorizer.issue_token().await,
    };

    let response = IssueTokenResponse {
        token: token.as_str().to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// An empty body issues an anonymous token; anything else must be a valid
/// `IssueTokenRequest`.
fn parse_issue_request(body: &[u8]) -> Result<IssueTokenRequest, SyncApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(IssueTokenRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected malformed token request: {}", e);
        SyncApiError::InvalidRequest(e.to_string())
    })
}

/// GET /health - Liveness and connection counts
pub async fn health(State(state): State<SyncAppState>) -> impl IntoResponse {
    let authorized = match &state.authorizer {
        Some(authorizer) => Some(authorizer.authorized_connection_ids().await.len()),
        None => None,
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        connections: state.connections.connection_count(),
        authorized,
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Errors returned by the sync HTTP endpoints.
#[derive(Debug, thiserror::Error)]
pub enum SyncApiError {
    #[error("A valid issuer key is required")]
    IssuerKeyRequired,

    #[error("Connection authorization is disabled on this server")]
    AuthorizationDisabled,

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),
}

impl IntoResponse for SyncApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            SyncApiError::IssuerKeyRequired => {
                (StatusCode::UNAUTHORIZED, ErrorCode::AuthenticationRequired)
            }
            SyncApiError::AuthorizationDisabled => {
                (StatusCode::NOT_FOUND, ErrorCode::AuthorizationDisabled)
            }
            SyncApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidRequest),
        };

        let error = ErrorResponse::new(code.to_string(), self.to_string());
        (status, Json(error)).into_response()
    }
}
