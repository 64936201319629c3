use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_ID_PREFIX: &str = "hls_";

/// Claim set carried inside an HLS access token.
///
/// Field names on the wire follow the registered JWT names where one exists
/// (`sub`, `iat`, `exp`, `jti`); the binding claims keep the `ip` / `userAgent`
/// names edge validators already look for.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HlsClaims {
    /// User the token was issued to
    #[serde(rename = "sub")]
    pub subject: u64,

    /// Video the token grants access to
    pub video_id: String,

    #[serde(rename = "iat")]
    pub issued_at: u64,

    #[serde(rename = "exp")]
    pub expires_at: u64,

    #[serde(rename = "jti")]
    pub token_id: String,

    /// Client address at issuance time. Compared, never parsed.
    #[serde(rename = "ip")]
    pub bound_ip: String,

    /// Client User-Agent at issuance time.
    #[serde(rename = "userAgent")]
    pub bound_agent: String,
}

impl HlsClaims {
    /// Seconds of validity left at `now`, zero once expired.
    pub fn remaining_secs(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    /// Field invariants a well-formed claim set always satisfies.
    pub(crate) fn has_valid_shape(&self) -> bool {
        self.subject > 0 && !self.video_id.is_empty() && self.expires_at > self.issued_at
    }
}

/// Fresh `jti` value: prefix plus a random v4 UUID.
pub(crate) fn new_token_id() -> String {
    format!("{TOKEN_ID_PREFIX}{}", Uuid::new_v4().simple())
}
