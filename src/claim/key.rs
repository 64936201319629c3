use crate::claim::error::ConfigError;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::fmt;
use std::sync::Arc;

/// Shortest accepted HS256 secret: a key as long as the hash output.
pub const MIN_SECRET_LEN: usize = 32;

struct KeyMaterial {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Shared HMAC secret used by both the issuer and the validator.
///
/// Cloning is cheap and never copies the secret. `Debug` does not print it.
#[derive(Clone)]
pub struct SigningKey {
    inner: Arc<KeyMaterial>,
}

impl SigningKey {
    /// Build a key from the configured secret string.
    ///
    /// Absent, blank or short secrets are refused here so nothing downstream
    /// can ever sign with them.
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret {
                len: secret.len(),
                min: MIN_SECRET_LEN,
            });
        }

        let bytes = secret.as_bytes();
        Ok(Self {
            inner: Arc::new(KeyMaterial {
                encoding: EncodingKey::from_secret(bytes),
                decoding: DecodingKey::from_secret(bytes),
            }),
        })
    }

    /// Same as [`SigningKey::new`] but for an optional value straight from config.
    pub fn from_config(secret: Option<&str>) -> Result<Self, ConfigError> {
        Self::new(secret.ok_or(ConfigError::MissingSecret)?)
    }

    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.inner.encoding
    }

    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.inner.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}
