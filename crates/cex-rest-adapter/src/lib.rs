/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public exchange REST adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod exchanges;
pub mod http;
pub mod ratelimit;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    Credentials,
    EvmWalletSigner,
    MockWalletSigner,
    RequestAuthenticator,
    SignatureType,
    WalletSigner,
};

// Re-export the exchange clients
pub use exchanges::{ApexClient, BybitClient, KucoinClient};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    ExchangeError,
    RequestSpec,
    RestClient,
    Result,
};

pub use ratelimit::{EndpointLimit, RateLimiter};

// Re-export all shared types
pub use types::*;
