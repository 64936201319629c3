pub mod error;
pub mod issuer;
pub mod key;
pub mod payload;
pub mod playlist;
pub mod policy;
pub mod validator;

use std::time::{SystemTime, UNIX_EPOCH};

// Re-export public types and functions
pub use error::{ClaimError, ConfigError, RejectReason, Rejection};
pub use issuer::{DEFAULT_TTL_SECS, IssueRequest, Issuance, TokenIssuer};
pub use key::{MIN_SECRET_LEN, SigningKey};
pub use payload::HlsClaims;
pub use playlist::{MANIFEST_FILENAME, TOKEN_QUERY_PARAM, compose_playlist_url};
pub use policy::{AccessPolicy, AllowAll, DenyAll};
pub use validator::TokenValidator;

/// Current wall-clock time in seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "end-to-end-secret-0123456789abcdef";

    #[tokio::test]
    async fn test_issue_validate_and_link() {
        let key = SigningKey::new(SECRET).unwrap();
        let issuer = TokenIssuer::new(key.clone());
        let validator = TokenValidator::new(key);
        let now = unix_now();

        let request = IssueRequest {
            subject: 9,
            video_id: "3f1c2a",
            client_ip: "192.0.2.1",
            client_agent: "AppleCoreMedia/1.0.0",
            ttl_secs: DEFAULT_TTL_SECS,
            now,
        };
        let token = issuer
            .issue_if_authorized(&request, &AllowAll)
            .await
            .unwrap()
            .token()
            .unwrap();

        let claims = validator.validate(&token, now).unwrap();
        assert_eq!(claims.video_id, "3f1c2a");
        assert_eq!(claims.bound_agent, "AppleCoreMedia/1.0.0");

        let url = compose_playlist_url("https://edge.example.net/", &claims.video_id, &token);
        assert_eq!(
            url,
            format!("https://edge.example.net/3f1c2a/index.m3u8?token={token}")
        );
    }

    #[test]
    fn test_unix_now_is_recent() {
        // 2023-11-14T22:13:20Z
        assert!(unix_now() > 1_700_000_000);
    }
}
