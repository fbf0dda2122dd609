/*
[INPUT]:  Base URL, client configuration, optional API key and wallet
[OUTPUT]: ApexClient wrapping the shared dispatcher
[POS]:    Apex adapter - client construction and request helpers
[UPDATE]: When adding connection options or auth modes
*/

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::{ApexSigner, Credentials, WalletSigner};
use crate::http::{ApexEnvelope, ClientConfig, ExchangeError, RequestSpec, RestClient, Result};
use crate::ratelimit::{EndpointLimit, RateLimiter};

pub const APEX_BASE_URL: &str = "https://pro.apex.exchange";
pub(crate) const API_PREFIX: &str = "/api/v1";

/// Apex v1 REST client
pub struct ApexClient {
    rest: RestClient,
    wallet: Option<Arc<dyn WalletSigner>>,
}

impl fmt::Debug for ApexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApexClient")
            .field("rest", &self.rest)
            .field("wallet", &self.wallet.as_ref().map(|w| w.address().to_string()))
            .finish()
    }
}

impl ApexClient {
    pub fn new() -> Result<Self> {
        Self::with_config_and_base_url(ClientConfig::default(), APEX_BASE_URL)
    }

    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        Ok(Self {
            rest: RestClient::with_config_and_base_url(config, base_url, RateLimiter::apex())?,
            wallet: None,
        })
    }

    /// Enable API-key endpoints; the credentials need a passphrase
    pub fn with_credentials(mut self, credentials: Credentials) -> Result<Self> {
        let signer = ApexSigner::new(credentials)?;
        self.rest = self.rest.with_authenticator(Arc::new(signer));
        Ok(self)
    }

    /// Wallet used to sign onboarding messages
    pub fn with_wallet(mut self, wallet: Arc<dyn WalletSigner>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    pub(crate) fn wallet(&self) -> Result<&dyn WalletSigner> {
        self.wallet
            .as_deref()
            .ok_or_else(|| ExchangeError::Config("apex onboarding needs a wallet signer".into()))
    }

    pub(crate) async fn public<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        self.rest
            .send::<ApexEnvelope<T>>(spec, EndpointLimit::PublicSpot)
            .await
    }

    pub(crate) async fn private<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        self.rest
            .send_signed::<ApexEnvelope<T>>(spec, EndpointLimit::PrivateSpot)
            .await
    }
}

pub(crate) fn endpoint(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}
