use crate::claim::{ConfigError, DEFAULT_TTL_SECS, SigningKey};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Environment variable holding the token signing secret.
pub const SECRET_ENV: &str = "VIDEO_JWT_SECRET";

/// Main configuration structure that can be loaded from CLI, config file, or environment
///
/// Example configuration file content
/// # HLS Token Service Configuration
///
/// listen_on_port = 32146
/// playlist_base_url = "https://cdn.example.com/hls"
/// default_ttl_secs = 3600
/// max_ttl_secs = 86400
/// trust_forwarded_for = true
///
/// # Prefer VIDEO_JWT_SECRET over keeping the secret in a file
/// signing_secret = "..."
#[derive(Clone, Serialize, Deserialize, Parser)]
#[serde(default)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Port for the token API to listen on
    #[arg(short, long, default_value_t = 32146)]
    #[serde(default = "default_port")]
    pub listen_on_port: u16,

    /// Configuration file path (CLI arguments take precedence over its values)
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// HMAC-SHA256 secret used to sign and verify tokens (at least 32 bytes).
    /// You can generate one with: openssl rand -base64 32
    #[arg(long, env = SECRET_ENV, hide_env_values = true)]
    #[serde(skip_serializing)]
    pub signing_secret: Option<String>,

    /// Base URL of the CDN/edge serving HLS playlists
    #[arg(short = 'b', long, default_value = "http://127.0.0.1:32145/videos")]
    #[serde(default = "default_playlist_base_url")]
    pub playlist_base_url: String,

    /// Token lifetime when the request does not ask for one
    #[arg(short = 't', long, default_value_t = DEFAULT_TTL_SECS)]
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Longest lifetime a request may ask for
    #[arg(long, default_value_t = 86400)]
    #[serde(default = "default_max_ttl_secs")]
    pub max_ttl_secs: u64,

    /// Take the client address from X-Forwarded-For (only behind a trusted proxy)
    #[arg(long)]
    pub trust_forwarded_for: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_on_port: default_port(),
            config: None,
            signing_secret: None,
            playlist_base_url: default_playlist_base_url(),
            default_ttl_secs: default_ttl_secs(),
            max_ttl_secs: default_max_ttl_secs(),
            trust_forwarded_for: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen_on_port", &self.listen_on_port)
            .field("config", &self.config)
            .field(
                "signing_secret",
                &self.signing_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("playlist_base_url", &self.playlist_base_url)
            .field("default_ttl_secs", &self.default_ttl_secs)
            .field("max_ttl_secs", &self.max_ttl_secs)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .finish()
    }
}

impl Config {
    /// Load configuration from CLI args and environment, optionally merging with a config file
    pub fn load() -> anyhow::Result<Self> {
        // First parse CLI args
        let mut config = Config::parse();

        // If a config file is specified, load it and merge
        if let Some(config_path) = &config.config {
            let file_config = Self::from_file(Path::new(config_path))?;
            config = config.merge_with_file(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge with file config, CLI args take precedence
    fn merge_with_file(mut self, file_config: Config) -> Self {
        // If CLI value is default, use file value
        if self.listen_on_port == default_port() {
            self.listen_on_port = file_config.listen_on_port;
        }
        if self.playlist_base_url == default_playlist_base_url() {
            self.playlist_base_url = file_config.playlist_base_url;
        }
        if self.default_ttl_secs == default_ttl_secs() {
            self.default_ttl_secs = file_config.default_ttl_secs;
        }
        if self.max_ttl_secs == default_max_ttl_secs() {
            self.max_ttl_secs = file_config.max_ttl_secs;
        }
        // A bare flag cannot say "off" on the CLI, so the file can only switch it on.
        if !self.trust_forwarded_for {
            self.trust_forwarded_for = file_config.trust_forwarded_for;
        }

        // For Option fields, CLI takes precedence if Some
        if self.signing_secret.is_none() {
            self.signing_secret = file_config.signing_secret;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.signing_key()?;

        if !self.playlist_base_url.starts_with("http://")
            && !self.playlist_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "Playlist base URL must start with http:// or https://"
            ));
        }

        if self.default_ttl_secs == 0 {
            return Err(anyhow::anyhow!("Default TTL must be positive"));
        }
        if self.default_ttl_secs > self.max_ttl_secs {
            return Err(anyhow::anyhow!(
                "Default TTL ({}s) exceeds max TTL ({}s)",
                self.default_ttl_secs,
                self.max_ttl_secs
            ));
        }

        Ok(())
    }

    /// Build the signing key from the configured secret
    pub fn signing_key(&self) -> Result<SigningKey, ConfigError> {
        SigningKey::from_config(self.signing_secret.as_deref())
    }
}

// Default value functions
fn default_port() -> u16 {
    32146
}

fn default_playlist_base_url() -> String {
    "http://127.0.0.1:32145/videos".to_string()
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_max_ttl_secs() -> u64 {
    86400
}
