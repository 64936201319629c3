pub mod api;
pub mod app_state;
pub mod claim;
pub mod config;

use axum::Router;
use axum::extract::Extension;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

//
// Re-export
//
pub use api::{
    ClientContext, IssueTokenRequest, IssueTokenResponse, ValidateTokenRequest, health,
    issue_token, log_request_errors, validate_token,
};
pub use app_state::AppState;
pub use claim::{
    AccessPolicy, AllowAll, ClaimError, ConfigError, DEFAULT_TTL_SECS, DenyAll, HlsClaims,
    IssueRequest, Issuance, RejectReason, Rejection, SigningKey, TokenIssuer, TokenValidator,
    compose_playlist_url, unix_now,
};
pub use config::Config;

/// Token API routes over `state`
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/tokens", post(issue_token))
        .route("/tokens/validate", post(validate_token))
        .layer(axum::middleware::from_fn(api::log_request_errors))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

/// Serve the token API, granting every access check.
pub async fn run(config: Config) -> anyhow::Result<()> {
    warn!("No access policy configured, every token request is granted");
    run_with_policy(config, Arc::new(AllowAll)).await
}

/// Serve the token API with `policy` deciding who gets a token.
pub async fn run_with_policy(config: Config, policy: Arc<dyn AccessPolicy>) -> anyhow::Result<()> {
    let state = AppState::new(&config, policy)?;
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.listen_on_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Token API listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
