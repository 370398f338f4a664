/*
[INPUT]:  Optional YAML configuration file and BYBIT_* environment variables
[OUTPUT]: Parsed bot configuration and exchange client settings
[POS]:    Configuration layer - session setup
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bybit_basic_adapter::{
    BybitClient, BybitError, Category, ClientConfig, Credentials, Environment,
};

/// Prefix for environment overrides, e.g. `BYBIT_API_KEY`
pub const ENV_PREFIX: &str = "BYBIT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key or secret not found. Set BYBIT_API_KEY and BYBIT_API_SECRET (a .env file works)")]
    MissingCredentials,

    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Top-level configuration for the bot
#[derive(Clone, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Use the exchange testnet
    #[serde(default = "default_testnet")]
    pub testnet: bool,
    /// Product category orders are routed to
    #[serde(default)]
    pub category: Category,
    /// Validity window for signed requests, in milliseconds
    #[serde(default = "default_recv_window")]
    pub recv_window: u64,
    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Overrides the environment's base URL
    #[serde(default)]
    pub base_url: Option<String>,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .field("testnet", &self.testnet)
            .field("category", &self.category)
            .field("recv_window", &self.recv_window)
            .field("timeout_secs", &self.timeout_secs)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            testnet: default_testnet(),
            category: Category::default(),
            recv_window: default_recv_window(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

fn default_testnet() -> bool {
    true
}

fn default_recv_window() -> u64 {
    bybit_basic_adapter::http::client::DEFAULT_RECV_WINDOW_MS
}

fn default_timeout_secs() -> u64 {
    30
}

impl BotConfig {
    /// Load configuration from an optional file, overridden by the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Same as [`load`](Self::load) but reads variables from `env` instead
    /// of the process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<::config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        );

        let config = builder.build()?.try_deserialize::<Self>()?;
        Ok(config)
    }

    /// API key pair; both values must be present and non-empty
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let key = self.api_key.as_deref().map(str::trim).unwrap_or_default();
        let secret = self.api_secret.as_deref().map(str::trim).unwrap_or_default();
        if key.is_empty() || secret.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(Credentials::new(key, secret))
    }

    pub fn environment(&self) -> Environment {
        Environment::from_testnet_flag(self.testnet)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            recv_window_ms: self.recv_window,
            ..ClientConfig::default()
        }
    }

    /// Build a signed exchange client for this configuration
    pub fn build_client(&self, credentials: Credentials) -> Result<BybitClient, BybitError> {
        let client = match self.base_url.as_deref() {
            Some(url) => BybitClient::with_config_and_base_url(self.client_config(), url)?,
            None => BybitClient::with_config(self.client_config(), self.environment())?,
        };
        Ok(client.with_credentials(credentials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<::config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_sources() {
        let config = BotConfig::load_with_env(None, env(&[])).unwrap();
        assert!(config.testnet);
        assert_eq!(config.category, Category::Linear);
        assert_eq!(config.recv_window, 5000);
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn reads_prefixed_environment() {
        let config = BotConfig::load_with_env(
            None,
            env(&[
                ("BYBIT_API_KEY", "key-123"),
                ("BYBIT_API_SECRET", "secret-456"),
                ("BYBIT_TESTNET", "false"),
                ("BYBIT_RECV_WINDOW", "10000"),
            ]),
        )
        .unwrap();

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.api_key, "key-123");
        assert_eq!(credentials.api_secret, "secret-456");
        assert_eq!(config.environment(), Environment::Mainnet);
        assert_eq!(config.client_config().recv_window_ms, 10_000);
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let config = BotConfig {
            api_key: Some("key".to_string()),
            api_secret: Some("  ".to_string()),
            ..BotConfig::default()
        };
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn debug_hides_secret() {
        let config = BotConfig {
            api_key: Some("visible-key".to_string()),
            api_secret: Some("hidden-secret".to_string()),
            ..BotConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(rendered.contains("visible-key"));
        assert!(!rendered.contains("hidden-secret"));
    }

    #[test]
    fn build_client_honours_base_url() {
        let config = BotConfig {
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..BotConfig::default()
        };
        let client = config
            .build_client(Credentials::new("key", "secret"))
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9/");
        assert!(client.has_credentials());
    }
}
