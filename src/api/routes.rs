use crate::AppState;
use crate::api::context::ClientContext;
use crate::claim::{HlsClaims, IssueRequest, Issuance, compose_playlist_url, unix_now};
use axum::extract::{ConnectInfo, Extension};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use tracing::{debug, error, info, warn};

/// Request body for `POST /tokens`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTokenRequest {
    /// User to issue the token for (required, > 0)
    pub user_id: u64,

    /// Video to grant access to (required)
    pub video_id: String,

    /// Token lifetime in seconds (optional, defaults to the configured TTL)
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

/// Response body for `POST /tokens`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTokenResponse {
    pub token: String,
    pub playlist_url: String,
    pub expires_at: u64,
}

/// Request body for `POST /tokens/validate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTokenRequest {
    pub token: String,
}

/// Create an error response
pub(crate) fn err_response(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "error": message,
        "status": status.as_u16()
    });

    (status, Json(body)).into_response()
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

#[axum::debug_handler]
pub async fn issue_token(
    Extension(state): Extension<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<IssueTokenRequest>,
) -> Response {
    let Some(ttl_secs) = state.resolve_ttl(request.ttl_secs) else {
        warn!(
            requested = request.ttl_secs,
            max_ttl_secs = state.max_ttl_secs,
            "Requested TTL too long"
        );
        return err_response(StatusCode::BAD_REQUEST, "ttl_secs exceeds the allowed maximum");
    };

    let client = ClientContext::from_request(&headers, peer, state.trust_forwarded_for);
    let now = unix_now();
    let issue_request = IssueRequest {
        subject: request.user_id,
        video_id: &request.video_id,
        client_ip: &client.ip,
        client_agent: &client.agent,
        ttl_secs,
        now,
    };

    let outcome = state
        .issuer
        .issue_if_authorized(&issue_request, state.policy.as_ref())
        .await;

    match outcome {
        Ok(Issuance::Issued(token)) => {
            info!(
                user_id = request.user_id,
                video_id = %request.video_id,
                ttl_secs,
                "Token created"
            );
            let playlist_url =
                compose_playlist_url(&state.playlist_base_url, &request.video_id, &token);
            let response = IssueTokenResponse {
                token,
                playlist_url,
                expires_at: now + ttl_secs,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Issuance::Denied) => err_response(StatusCode::FORBIDDEN, "access denied"),
        Err(err) => {
            let status = err.to_err_code();
            if status.is_server_error() {
                error!(?err, "Failed to create token");
                err_response(status, "failed to create token")
            } else {
                err_response(status, &err.to_string())
            }
        }
    }
}

pub async fn validate_token(
    Extension(state): Extension<AppState>,
    Json(request): Json<ValidateTokenRequest>,
) -> Response {
    match state.validator.validate(&request.token, unix_now()) {
        Ok(claims) => {
            debug!(
                token_id = %claims.token_id,
                video_id = %claims.video_id,
                "Token validated"
            );
            (StatusCode::OK, Json::<HlsClaims>(claims)).into_response()
        }
        Err(rejection) => {
            debug!(reason = rejection.reason().as_str(), "Token validation failed");
            err_response(rejection.to_err_code(), &rejection.to_string())
        }
    }
}
