use crate::claim::error::ClaimError;
use crate::claim::key::SigningKey;
use crate::claim::payload::{HlsClaims, new_token_id};
use crate::claim::policy::AccessPolicy;
use jsonwebtoken::{Algorithm, Header};
use tracing::{debug, info};

/// Lifetime of a token when the caller does not ask for one.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Result of an issuance gated on an access check.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Issuance {
    Issued(String),
    Denied,
}

impl Issuance {
    pub fn token(self) -> Option<String> {
        match self {
            Issuance::Issued(token) => Some(token),
            Issuance::Denied => None,
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Issuance::Denied)
    }
}

/// Per-request inputs of an issuance.
#[derive(Debug, Clone, Copy)]
pub struct IssueRequest<'a> {
    pub subject: u64,
    pub video_id: &'a str,
    pub client_ip: &'a str,
    pub client_agent: &'a str,
    pub ttl_secs: u64,
    pub now: u64,
}

/// Builds and signs HLS access tokens.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: SigningKey,
}

impl TokenIssuer {
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    /// Build the claim set for `request` and sign it with HS256.
    pub fn issue(&self, request: &IssueRequest<'_>) -> Result<String, ClaimError> {
        let claims = Self::build_claims(request)?;
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            self.key.encoding(),
        )?;

        debug!(
            subject = claims.subject,
            video_id = %claims.video_id,
            token_id = %claims.token_id,
            expires_at = claims.expires_at,
            "Token issued"
        );

        Ok(token)
    }

    /// Ask `policy` first; sign only when it grants access.
    pub async fn issue_if_authorized<P>(
        &self,
        request: &IssueRequest<'_>,
        policy: &P,
    ) -> Result<Issuance, ClaimError>
    where
        P: AccessPolicy + ?Sized,
    {
        if !policy.has_access(request.subject, request.video_id).await {
            info!(
                subject = request.subject,
                video_id = %request.video_id,
                "Access denied, no token issued"
            );
            return Ok(Issuance::Denied);
        }

        self.issue(request).map(Issuance::Issued)
    }

    fn build_claims(request: &IssueRequest<'_>) -> Result<HlsClaims, ClaimError> {
        if request.subject == 0 {
            return Err(ClaimError::InvalidInput("subject must be positive"));
        }
        if request.video_id.is_empty() {
            return Err(ClaimError::InvalidInput("video_id is required"));
        }
        if request.ttl_secs == 0 {
            return Err(ClaimError::InvalidInput("ttl must be positive"));
        }
        let expires_at = request
            .now
            .checked_add(request.ttl_secs)
            .ok_or(ClaimError::InvalidInput("ttl overflows expiry time"))?;

        Ok(HlsClaims {
            subject: request.subject,
            video_id: request.video_id.to_string(),
            issued_at: request.now,
            expires_at,
            token_id: new_token_id(),
            bound_ip: request.client_ip.to_string(),
            bound_agent: request.client_agent.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::policy::{AllowAll, DenyAll};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes";
    const NOW: u64 = 1_700_000_000;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SigningKey::new(SECRET).unwrap())
    }

    fn request(video_id: &str) -> IssueRequest<'_> {
        IssueRequest {
            subject: 42,
            video_id,
            client_ip: "203.0.113.7",
            client_agent: "Mozilla/5.0",
            ttl_secs: DEFAULT_TTL_SECS,
            now: NOW,
        }
    }

    #[test]
    fn test_issue_produces_three_part_token() {
        let token = issuer().issue(&request("vid123")).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        );
    }

    #[test]
    fn test_build_claims_from_request() {
        let claims = TokenIssuer::build_claims(&request("vid123")).unwrap();

        assert_eq!(claims.subject, 42);
        assert_eq!(claims.video_id, "vid123");
        assert_eq!(claims.issued_at, NOW);
        assert_eq!(claims.expires_at, NOW + 3600);
        assert_eq!(claims.bound_ip, "203.0.113.7");
        assert_eq!(claims.bound_agent, "Mozilla/5.0");
        assert!(claims.token_id.starts_with("hls_"));
    }

    #[test]
    fn test_issue_allows_unknown_client_context() {
        let req = IssueRequest {
            client_ip: "",
            client_agent: "",
            ..request("vid123")
        };

        assert!(issuer().issue(&req).is_ok());
    }

    #[test]
    fn test_issue_rejects_invalid_input() {
        let issuer = issuer();

        let zero_subject = IssueRequest {
            subject: 0,
            ..request("vid123")
        };
        assert!(matches!(
            issuer.issue(&zero_subject),
            Err(ClaimError::InvalidInput(_))
        ));

        assert!(matches!(
            issuer.issue(&request("")),
            Err(ClaimError::InvalidInput(_))
        ));

        let zero_ttl = IssueRequest {
            ttl_secs: 0,
            ..request("vid123")
        };
        assert!(matches!(
            issuer.issue(&zero_ttl),
            Err(ClaimError::InvalidInput(_))
        ));

        let overflow = IssueRequest {
            ttl_secs: u64::MAX,
            ..request("vid123")
        };
        assert!(matches!(
            issuer.issue(&overflow),
            Err(ClaimError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_same_second_issuances_differ() {
        let issuer = issuer();
        let a = TokenIssuer::build_claims(&request("vid123")).unwrap();
        let b = TokenIssuer::build_claims(&request("vid123")).unwrap();
        assert_ne!(a.token_id, b.token_id);

        let ta = issuer.issue(&request("vid123")).unwrap();
        let tb = issuer.issue(&request("vid123")).unwrap();
        assert_ne!(ta, tb);
    }

    #[tokio::test]
    async fn test_issue_if_authorized_denied() {
        let outcome = issuer()
            .issue_if_authorized(&request("vid123"), &DenyAll)
            .await
            .unwrap();

        assert!(outcome.is_denied());
        assert_eq!(outcome.token(), None);
    }

    #[tokio::test]
    async fn test_issue_if_authorized_denial_skips_validation_of_input() {
        // Denial is decided before the request is inspected for signing.
        let outcome = issuer()
            .issue_if_authorized(&request(""), &DenyAll)
            .await
            .unwrap();
        assert_eq!(outcome, Issuance::Denied);
    }

    #[tokio::test]
    async fn test_issue_if_authorized_granted() {
        let outcome = issuer()
            .issue_if_authorized(&request("vid123"), &AllowAll)
            .await
            .unwrap();

        let token = outcome.token().unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[tokio::test]
    async fn test_issue_if_authorized_consults_policy_once() {
        let calls = AtomicUsize::new(0);
        let policy = |subject: u64, video_id: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            subject == 42 && video_id == "vid123"
        };

        let issuer = issuer();
        let granted = issuer
            .issue_if_authorized(&request("vid123"), &policy)
            .await
            .unwrap();
        let denied = issuer
            .issue_if_authorized(&request("other"), &policy)
            .await
            .unwrap();

        assert!(matches!(granted, Issuance::Issued(_)));
        assert_eq!(denied, Issuance::Denied);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
