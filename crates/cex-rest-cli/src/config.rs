/*
[INPUT]:  Optional YAML configuration file, CEX_REST_* environment variables
[OUTPUT]: Parsed per-exchange connection settings
[POS]:    Configuration layer - client setup
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cex_rest_adapter::{ClientConfig, Credentials};
use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "CEX_REST";

/// Top-level configuration for the `cex-rest` binary
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Request timeout applied to every exchange client
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub apex: ExchangeConfig,
    #[serde(default)]
    pub bybit: ExchangeConfig,
    #[serde(default)]
    pub kucoin: ExchangeConfig,
}

/// Connection settings for one exchange; every field is optional
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct ExchangeConfig {
    /// Overrides the exchange's production base URL
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// KuCoin and Apex API keys carry a passphrase
    pub passphrase: Option<String>,
    /// Bybit `X-BAPI-RECV-WINDOW`
    pub recv_window_ms: Option<u64>,
    /// Hex private key used for Apex onboarding signatures
    pub eth_private_key: Option<String>,
    pub chain_id: Option<u64>,
}

impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("recv_window_ms", &self.recv_window_ms)
            .field("eth_private_key", &self.eth_private_key.as_ref().map(|_| "<redacted>"))
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

impl ExchangeConfig {
    /// API credentials, present only when both key and secret are set
    pub fn credentials(&self) -> Option<Credentials> {
        let key = self.api_key.as_deref().filter(|k| !k.is_empty())?;
        let secret = self.api_secret.as_deref().filter(|s| !s.is_empty())?;
        let credentials = Credentials::new(key, secret);
        Some(match self.passphrase.as_deref().filter(|p| !p.is_empty()) {
            Some(passphrase) => credentials.with_passphrase(passphrase),
            None => credentials,
        })
    }

    pub fn base_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(default)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            apex: ExchangeConfig::default(),
            bybit: ExchangeConfig::default(),
            kucoin: ExchangeConfig::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl CliConfig {
    /// Load the optional YAML file, then overlay `CEX_REST_*` variables
    ///
    /// Nested keys use `__`, e.g. `CEX_REST_KUCOIN__API_KEY`. Values stay
    /// strings until deserialization so numeric-looking secrets keep their digits.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_sources(path, None)
    }

    /// Same as [`CliConfig::load`] with an explicit environment map instead of the process env
    pub fn from_sources(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(env),
        );

        builder
            .build()
            .context("read configuration sources")?
            .try_deserialize()
            .context("parse configuration")
    }

    /// Parse a YAML document directly
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("parse yaml configuration")
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientConfig::default()
        }
    }
}
