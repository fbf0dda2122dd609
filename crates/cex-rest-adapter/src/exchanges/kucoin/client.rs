/*
[INPUT]:  Base URL, client configuration, optional API key with passphrase
[OUTPUT]: KucoinClient wrapping the shared dispatcher
[POS]:    KuCoin adapter - client construction and request helpers
[UPDATE]: When adding connection options or endpoint groups
*/

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::{Credentials, KucoinSigner};
use crate::http::{ClientConfig, KucoinEnvelope, RequestSpec, RestClient, Result};
use crate::ratelimit::{EndpointLimit, RateLimiter};

pub const KUCOIN_BASE_URL: &str = "https://api.kucoin.com";

/// KuCoin spot REST client
#[derive(Debug)]
pub struct KucoinClient {
    rest: RestClient,
}

impl KucoinClient {
    pub fn new() -> Result<Self> {
        Self::with_config_and_base_url(ClientConfig::default(), KUCOIN_BASE_URL)
    }

    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        Ok(Self {
            rest: RestClient::with_config_and_base_url(config, base_url, RateLimiter::kucoin())?,
        })
    }

    /// Enable private endpoints; fails when the passphrase is missing
    pub fn with_credentials(mut self, credentials: Credentials) -> Result<Self> {
        let signer = KucoinSigner::new(credentials)?;
        self.rest = self.rest.with_authenticator(Arc::new(signer));
        Ok(self)
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    pub(crate) async fn public<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        self.rest
            .send::<KucoinEnvelope<T>>(spec, EndpointLimit::PublicSpot)
            .await
    }

    pub(crate) async fn private<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        self.rest
            .send_signed::<KucoinEnvelope<T>>(spec, EndpointLimit::PrivateSpot)
            .await
    }
}
