/*
[INPUT]:  Request specs, exchange base URLs, client configuration
[OUTPUT]: HTTP responses decoded into typed payloads
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding body encodings, envelopes or dispatch options
*/

pub mod client;
pub mod envelope;
pub mod error;
pub mod request;

pub use client::{ClientConfig, RestClient};
pub use envelope::{ApexEnvelope, BybitEnvelope, Envelope, KucoinEnvelope, KUCOIN_SUCCESS_CODE};
pub use error::{ExchangeError, Result};
pub use request::{
    RequestBody, RequestSpec, require_non_empty, require_one_of, require_path_id, require_positive,
};
