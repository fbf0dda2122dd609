/*
[INPUT]:  RequestSpec, EndpointLimit, optional request authenticator
[OUTPUT]: Typed payloads decoded from exchange envelopes, or ExchangeError
[POS]:    HTTP layer - rate-limited, signed dispatch shared by every exchange client
[UPDATE]: When adding connection options or changing dispatch order
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::auth::RequestAuthenticator;
use crate::http::{Envelope, ExchangeError, RequestSpec, Result};
use crate::ratelimit::{EndpointLimit, RateLimiter};

const DEFAULT_USER_AGENT: &str = concat!("cex-rest-adapter/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Dispatcher: limiter, then signer, then HTTP, then envelope
///
/// Cheap to share behind an `Arc`; the only mutable state is inside the
/// rate limiter's buckets.
pub struct RestClient {
    http: Client,
    base_url: Url,
    limiter: Arc<RateLimiter>,
    authenticator: Option<Arc<dyn RequestAuthenticator>>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .field("limiter", &self.limiter)
            .field("authenticated", &self.authenticator.is_some())
            .finish()
    }
}

impl RestClient {
    /// Create a client with default configuration
    pub fn new(base_url: &str, limiter: RateLimiter) -> Result<Self> {
        Self::with_config_and_base_url(ClientConfig::default(), base_url, limiter)
    }

    /// Create a client with custom configuration and base URL
    ///
    /// `base_url` is a scheme and host; request paths are absolute.
    pub fn with_config_and_base_url(
        config: ClientConfig,
        base_url: &str,
        limiter: RateLimiter,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            limiter: Arc::new(limiter),
            authenticator: None,
        })
    }

    /// Attach a signer for authenticated endpoints
    pub fn with_authenticator(mut self, authenticator: Arc<dyn RequestAuthenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.authenticator.is_some()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Send an unauthenticated request and unwrap its envelope
    pub async fn send<E: Envelope>(
        &self,
        spec: RequestSpec,
        limit: EndpointLimit,
    ) -> Result<E::Payload> {
        self.dispatch::<E>(spec, limit, None).await?.into_result()
    }

    /// Send an unauthenticated request whose envelope has no payload of interest
    pub async fn send_unit<E: Envelope>(&self, spec: RequestSpec, limit: EndpointLimit) -> Result<()> {
        self.dispatch::<E>(spec, limit, None).await?.into_unit()
    }

    /// Sign and send a request
    ///
    /// Fails with [`ExchangeError::MissingCredentials`] before touching the
    /// limiter or the network when no authenticator is configured.
    pub async fn send_signed<E: Envelope>(
        &self,
        spec: RequestSpec,
        limit: EndpointLimit,
    ) -> Result<E::Payload> {
        let authenticator = self.require_authenticator()?;
        self.dispatch::<E>(spec, limit, Some(authenticator))
            .await?
            .into_result()
    }

    pub async fn send_signed_unit<E: Envelope>(
        &self,
        spec: RequestSpec,
        limit: EndpointLimit,
    ) -> Result<()> {
        let authenticator = self.require_authenticator()?;
        self.dispatch::<E>(spec, limit, Some(authenticator))
            .await?
            .into_unit()
    }

    fn require_authenticator(&self) -> Result<&dyn RequestAuthenticator> {
        self.authenticator
            .as_deref()
            .ok_or(ExchangeError::MissingCredentials)
    }

    /// Resolve the request against the base URL
    ///
    /// Signers sign `path_and_query` verbatim, so a path the URL parser would
    /// rewrite (dot segments, characters it percent-encodes) is refused.
    fn wire_url(&self, spec: &RequestSpec) -> Result<Url> {
        let signed = spec.path_and_query();
        let url = self.base_url.join(&signed)?;
        let sent = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        if sent != signed {
            return Err(ExchangeError::validation(
                "path",
                format!("`{signed}` would be sent as `{sent}`"),
            ));
        }
        Ok(url)
    }

    async fn dispatch<E: Envelope>(
        &self,
        mut spec: RequestSpec,
        limit: EndpointLimit,
        authenticator: Option<&dyn RequestAuthenticator>,
    ) -> Result<E> {
        let url = self.wire_url(&spec)?;
        self.limiter.acquire(limit).await;

        // timestamp taken after the wait so it is fresh for the exchange's recv window
        if let Some(authenticator) = authenticator {
            let timestamp_ms = chrono::Utc::now().timestamp_millis();
            authenticator.authenticate(&mut spec, timestamp_ms)?;
        }

        debug!(method = %spec.method(), %url, ?limit, "dispatching request");

        let mut builder = self.http.request(spec.method().clone(), url);
        for (name, value) in spec.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(content_type) = spec.body().content_type() {
            builder = builder
                .header(CONTENT_TYPE, content_type)
                .body(spec.body_string().to_string());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // exchanges report most rejections as error envelopes under 4xx
            if let Ok(envelope) = serde_json::from_str::<E>(&body) {
                envelope.into_unit().inspect_err(|err| {
                    warn!(status = status.as_u16(), error = %err, "exchange rejected request");
                })?;
            }
            warn!(status = status.as_u16(), path = spec.path(), "unexpected HTTP status");
            return Err(ExchangeError::status(status, body));
        }

        let envelope: E = serde_json::from_str(&body).inspect_err(|err| {
            warn!(path = spec.path(), error = %err, "response did not match schema");
        })?;
        Ok(envelope)
    }
}
