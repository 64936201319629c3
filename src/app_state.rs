use crate::Config;
use crate::claim::{AccessPolicy, TokenIssuer, TokenValidator};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
    pub policy: Arc<dyn AccessPolicy>,

    pub playlist_base_url: Arc<str>,
    pub default_ttl_secs: u64,
    pub max_ttl_secs: u64,
    pub trust_forwarded_for: bool,
}

impl AppState {
    /// Build the shared state. Fails when the configured signing secret is unusable.
    pub fn new(config: &Config, policy: Arc<dyn AccessPolicy>) -> anyhow::Result<Self> {
        let key = config.signing_key()?;

        info!(
            playlist_base_url = %config.playlist_base_url,
            default_ttl_secs = config.default_ttl_secs,
            max_ttl_secs = config.max_ttl_secs,
            trust_forwarded_for = config.trust_forwarded_for,
            "Token service configured"
        );

        Ok(Self {
            issuer: TokenIssuer::new(key.clone()),
            validator: TokenValidator::new(key),
            policy,

            playlist_base_url: Arc::from(config.playlist_base_url.as_str()),
            default_ttl_secs: config.default_ttl_secs,
            max_ttl_secs: config.max_ttl_secs,
            trust_forwarded_for: config.trust_forwarded_for,
        })
    }

    /// Lifetime for a request, `None` when it asks for more than allowed.
    pub fn resolve_ttl(&self, requested: Option<u64>) -> Option<u64> {
        match requested {
            None => Some(self.default_ttl_secs),
            Some(ttl) if ttl <= self.max_ttl_secs => Some(ttl),
            Some(_) => None,
        }
    }
}
