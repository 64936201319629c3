pub mod context;
pub mod middleware;
pub mod routes;

// Re-export public types and functions
pub use context::ClientContext;
pub use middleware::log_request_errors;
pub use routes::{
    IssueTokenRequest, IssueTokenResponse, ValidateTokenRequest, health, issue_token,
    validate_token,
};
