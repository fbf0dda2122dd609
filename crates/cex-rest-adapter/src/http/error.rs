/*
[INPUT]:  Error sources (transport, envelope decode, exchange codes, validation, signing)
[OUTPUT]: Structured error types with retry and classification hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the exchange REST adapters
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// HTTP transport failed (connect, timeout, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status whose body was not a recognisable envelope
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Exchange returned an application error inside its envelope
    #[error("API error (code {code}): {message}")]
    Api { code: i64, message: String },

    /// Response body did not match the expected schema
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A required parameter was missing or malformed
    #[error("Invalid parameter `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A signed endpoint was called on a client without credentials
    #[error("Credentials required for authenticated endpoint")]
    MissingCredentials,

    /// Raw signature could not be turned into a typed signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Signing backend failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Envelope was well-formed but unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExchangeError {
    /// Check if the error is worth retrying at the caller level
    pub fn is_retryable(&self) -> bool {
        match self {
            ExchangeError::Http(_) => true,
            ExchangeError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            _ => false,
        }
    }

    /// Check if the error came from the exchange's envelope
    pub fn is_domain_error(&self) -> bool {
        matches!(self, ExchangeError::Api { .. })
    }

    /// Check if error indicates an authentication problem on our side
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ExchangeError::MissingCredentials
                | ExchangeError::InvalidSignature(_)
                | ExchangeError::Signing(_)
        )
    }

    /// Build a validation error for a required parameter
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ExchangeError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Build a status error from a raw response
    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        ExchangeError::Status {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}

/// Result type alias for exchange operations
pub type Result<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let throttled = ExchangeError::status(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(throttled.is_retryable());

        let outage = ExchangeError::status(StatusCode::BAD_GATEWAY, "");
        assert!(outage.is_retryable());

        let rejected = ExchangeError::status(StatusCode::BAD_REQUEST, "bad");
        assert!(!rejected.is_retryable());

        let domain = ExchangeError::Api {
            code: 10001,
            message: "x".to_string(),
        };
        assert!(!domain.is_retryable());
        assert!(domain.is_domain_error());
    }

    #[test]
    fn test_decode_error_is_fatal() {
        let err = serde_json::from_str::<u32>("{").unwrap_err();
        let err = ExchangeError::from(err);
        assert!(!err.is_retryable());
        assert!(!err.is_domain_error());
    }

    #[test]
    fn test_error_is_auth_error() {
        assert!(ExchangeError::MissingCredentials.is_auth_error());
        assert!(ExchangeError::InvalidSignature("len".into()).is_auth_error());
        assert!(!ExchangeError::validation("symbol", "empty").is_auth_error());
    }

    #[test]
    fn test_validation_message() {
        let err = ExchangeError::validation("symbol", "must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid parameter `symbol`: must not be empty"
        );
    }
}
