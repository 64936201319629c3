use crate::claim::error::{RejectReason, Rejection};
use crate::claim::key::SigningKey;
use crate::claim::payload::HlsClaims;
use jsonwebtoken::{Algorithm, Validation};
use std::collections::HashSet;
use tracing::debug;

/// Verifies HLS access tokens.
///
/// Only signature, structure and time are checked. Comparing the bound IP and
/// User-Agent with the live request is left to the caller, which owns the
/// request context.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    key: SigningKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(key: SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time claims are checked below against the caller's clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::new();

        Self { key, validation }
    }

    /// Verify `token` and return its claims, or a rejection.
    pub fn validate(&self, token: &str, now: u64) -> Result<HlsClaims, Rejection> {
        self.check(token, now).map_err(|reason| {
            debug!(reason = reason.as_str(), "Token rejected");
            Rejection::new(reason)
        })
    }

    fn check(&self, token: &str, now: u64) -> Result<HlsClaims, RejectReason> {
        let data = jsonwebtoken::decode::<HlsClaims>(token, self.key.decoding(), &self.validation)
            .map_err(|error| RejectReason::from(&error))?;
        let claims = data.claims;

        if !claims.has_valid_shape() {
            return Err(RejectReason::InvalidClaims);
        }
        if claims.is_expired(now) {
            return Err(RejectReason::Expired);
        }
        if claims.issued_at > now {
            return Err(RejectReason::NotYetValid);
        }

        Ok(claims)
    }
}
