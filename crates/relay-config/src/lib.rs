//! Configuration management for the relay.
//!
//! Parses `relay.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - all `oauth.*` string fields
//! - `notify.*` and `kms.*` string fields

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use expand::expand_env;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the OAuth callback URI.
    pub callback_uri: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "relay.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream OAuth provider configuration.
    pub oauth: OAuthConfig,
    /// Notification topics (optional section; absence disables publishing).
    pub notify: Option<NotifyConfig>,
    /// KMS decryption (optional section; presence enables secret decryption).
    pub kms: Option<KmsConfig>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// Upstream OAuth 1.0a provider configuration.
#[derive(Debug, Deserialize)]
pub struct OAuthConfig {
    /// Consumer key identifying this application.
    pub consumer_key: String,
    /// Consumer secret (HMAC-SHA1 signing key; may be a KMS ciphertext).
    pub consumer_secret: String,
    /// Signature method: `"HMAC-SHA1"` or `"RSA-SHA1"`.
    #[serde(default = "default_signature_method")]
    pub signature_method: String,
    /// PEM file with the RSA private key (RSA-SHA1 only).
    pub private_key_file: Option<PathBuf>,
    /// Request-token endpoint (first leg).
    pub request_token_uri: String,
    /// Access-token endpoint (third leg).
    pub access_token_uri: String,
    /// User authorization endpoint (second leg), if the provider has one.
    pub authorize_uri: Option<String>,
    /// Callback used when the caller supplies none.
    #[serde(default = "default_callback_uri")]
    pub callback_uri: String,
    /// Content type for signed POST bodies.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Extra headers attached to every signed request.
    #[serde(default)]
    pub custom_headers: BTreeMap<String, String>,
}

fn default_signature_method() -> String {
    "HMAC-SHA1".to_owned()
}

fn default_callback_uri() -> String {
    "oob".to_owned()
}

fn default_content_type() -> String {
    "application/json".to_owned()
}

impl OAuthConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.consumer_key, "oauth.consumer_key")?;
        require_non_empty(&self.consumer_secret, "oauth.consumer_secret")?;
        require_http_url(&self.request_token_uri, "oauth.request_token_uri")?;
        require_http_url(&self.access_token_uri, "oauth.access_token_uri")?;
        if let Some(uri) = &self.authorize_uri {
            require_http_url(uri, "oauth.authorize_uri")?;
        }
        match self.signature_method.as_str() {
            "HMAC-SHA1" => {}
            "RSA-SHA1" => {
                if self.private_key_file.is_none() {
                    return Err(ConfigError::Validation(
                        "oauth.private_key_file is required for RSA-SHA1".to_owned(),
                    ));
                }
            }
            other => {
                return Err(ConfigError::Validation(format!(
                    "oauth.signature_method must be HMAC-SHA1 or RSA-SHA1, got {other:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Notification topic configuration.
#[derive(Debug, Deserialize)]
pub struct NotifyConfig {
    /// Topic ARN for success notifications.
    pub success_topic_arn: String,
    /// Topic ARN for failure notifications.
    pub failure_topic_arn: String,
    /// AWS region of the topics.
    pub region: String,
}

/// KMS decryption configuration.
#[derive(Debug, Deserialize)]
pub struct KmsConfig {
    /// AWS region of the key.
    pub region: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`oauth.consumer_secret`").
        field: String,
        /// Error message (e.g., "${`RELAY_SECRET`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `relay.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns an error if no config is found, an explicit `config_path`
    /// doesn't exist, or parsing/validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            return Err(ConfigError::NotFound(PathBuf::from(CONFIG_FILENAME)));
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from TOML text, expand, and validate.
    ///
    /// # Errors
    ///
    /// Returns an error on parse, expansion, or validation failure.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(callback_uri) = &settings.callback_uri {
            self.oauth.callback_uri.clone_from(callback_uri);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.oauth.validate()?;
        if let Some(notify) = &self.notify {
            require_non_empty(&notify.success_topic_arn, "notify.success_topic_arn")?;
            require_non_empty(&notify.failure_topic_arn, "notify.failure_topic_arn")?;
            require_non_empty(&notify.region, "notify.region")?;
        }
        if let Some(kms) = &self.kms {
            require_non_empty(&kms.region, "kms.region")?;
        }
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        let oauth = &mut self.oauth;
        oauth.consumer_key = expand::expand_env(&oauth.consumer_key, "oauth.consumer_key")?;
        oauth.consumer_secret =
            expand::expand_env(&oauth.consumer_secret, "oauth.consumer_secret")?;
        oauth.request_token_uri =
            expand::expand_env(&oauth.request_token_uri, "oauth.request_token_uri")?;
        oauth.access_token_uri =
            expand::expand_env(&oauth.access_token_uri, "oauth.access_token_uri")?;
        if let Some(uri) = &oauth.authorize_uri {
            oauth.authorize_uri = Some(expand::expand_env(uri, "oauth.authorize_uri")?);
        }
        oauth.callback_uri = expand::expand_env(&oauth.callback_uri, "oauth.callback_uri")?;

        if let Some(ref mut notify) = self.notify {
            notify.success_topic_arn =
                expand::expand_env(&notify.success_topic_arn, "notify.success_topic_arn")?;
            notify.failure_topic_arn =
                expand::expand_env(&notify.failure_topic_arn, "notify.failure_topic_arn")?;
            notify.region = expand::expand_env(&notify.region, "notify.region")?;
        }
        if let Some(ref mut kms) = self.kms {
            kms.region = expand::expand_env(&kms.region, "kms.region")?;
        }

        Ok(())
    }
}
