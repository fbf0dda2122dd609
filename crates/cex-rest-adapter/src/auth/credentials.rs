/*
[INPUT]:  API key material supplied by configuration
[OUTPUT]: Immutable per-session credentials with redacted Debug output
[POS]:    Auth layer - credential holder shared by HMAC signers
[UPDATE]: When an exchange needs additional key material
*/

use std::fmt;

use crate::http::{ExchangeError, Result};

/// API key, secret and optional passphrase for one exchange account
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            passphrase: None,
        }
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// Passphrase, or a configuration error naming the exchange that needs it
    pub fn require_passphrase(&self, exchange: &str) -> Result<&str> {
        self.passphrase
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ExchangeError::Config(format!("{exchange} credentials need a passphrase")))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
