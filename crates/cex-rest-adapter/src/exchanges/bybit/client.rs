/*
[INPUT]:  Base URL, client configuration, optional API key
[OUTPUT]: BybitClient wrapping the shared dispatcher
[POS]:    Bybit adapter - client construction and request helpers
[UPDATE]: When adding connection options or endpoint groups
*/

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::{BybitSigner, Credentials};
use crate::http::{BybitEnvelope, ClientConfig, ExchangeError, RequestSpec, RestClient, Result};
use crate::ratelimit::{EndpointLimit, RateLimiter};

pub const BYBIT_BASE_URL: &str = "https://api.bybit.com";

pub(crate) const PERPETUAL_PUBLIC: &str = "/perpetual/usdc/openapi/public/v1";
pub(crate) const PERPETUAL_PRIVATE: &str = "/perpetual/usdc/openapi/private/v1";
pub(crate) const OPTION_PUBLIC: &str = "/option/usdc/openapi/public/v1";
pub(crate) const OPTION_PRIVATE: &str = "/option/usdc/openapi/private/v1";

/// Bybit USDC perpetual REST client
#[derive(Debug)]
pub struct BybitClient {
    rest: RestClient,
}

impl BybitClient {
    pub fn new() -> Result<Self> {
        Self::with_config_and_base_url(ClientConfig::default(), BYBIT_BASE_URL)
    }

    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        Ok(Self {
            rest: RestClient::with_config_and_base_url(config, base_url, RateLimiter::bybit())?,
        })
    }

    /// Enable private endpoints with the default receive window
    pub fn with_credentials(self, credentials: Credentials) -> Self {
        self.with_signer(BybitSigner::new(credentials))
    }

    pub fn with_signer(mut self, signer: BybitSigner) -> Self {
        self.rest = self.rest.with_authenticator(Arc::new(signer));
        self
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    pub(crate) async fn public<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        self.rest
            .send::<BybitEnvelope<T>>(spec, EndpointLimit::PublicFutures)
            .await
    }

    pub(crate) async fn private<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
        limit: EndpointLimit,
    ) -> Result<T> {
        self.rest.send_signed::<BybitEnvelope<T>>(spec, limit).await
    }

    pub(crate) async fn private_unit(&self, spec: RequestSpec, limit: EndpointLimit) -> Result<()> {
        self.rest
            .send_signed_unit::<BybitEnvelope<serde_json::Value>>(spec, limit)
            .await
    }
}

/// Reject a page size outside `1..=max`
pub(crate) fn check_limit(limit: Option<u32>, max: u32) -> Result<()> {
    match limit {
        Some(value) if value == 0 || value > max => Err(ExchangeError::validation(
            "limit",
            format!("must be within 1..={max}, got {value}"),
        )),
        _ => Ok(()),
    }
}
