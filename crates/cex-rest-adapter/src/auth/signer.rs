/*
[INPUT]:  RequestSpec (method, path?query, body), timestamp, credentials
[OUTPUT]: Exchange-specific authentication headers attached to the request
[POS]:    Auth layer - HMAC-SHA256 request signing for API-key endpoints
[UPDATE]: When an exchange changes its prehash layout or header names
*/

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use reqwest::Method;
use sha2::Sha256;

use crate::auth::Credentials;
use crate::http::{ExchangeError, RequestSpec, Result};

type HmacSha256 = Hmac<Sha256>;

/// Attaches authentication headers to an outbound request
///
/// Called by the dispatcher after the rate limiter admits the request, so
/// `timestamp_ms` is taken as close to the wire as possible.
pub trait RequestAuthenticator: Send + Sync + fmt::Debug {
    fn authenticate(&self, spec: &mut RequestSpec, timestamp_ms: i64) -> Result<()>;
}

fn hmac_sha256(secret: &[u8], message: &str) -> Result<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|e| ExchangeError::Signing(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// base64(HMAC-SHA256(secret, message))
pub fn sign_base64(secret: &[u8], message: &str) -> Result<String> {
    Ok(BASE64.encode(hmac_sha256(secret, message)?))
}

/// hex(HMAC-SHA256(secret, message))
pub fn sign_hex(secret: &[u8], message: &str) -> Result<String> {
    Ok(hex::encode(hmac_sha256(secret, message)?))
}

/// KuCoin API key version 2
#[derive(Debug, Clone)]
pub struct KucoinSigner {
    credentials: Credentials,
}

impl KucoinSigner {
    pub const KEY_VERSION: &'static str = "2";

    /// Fails when the credentials carry no passphrase
    pub fn new(credentials: Credentials) -> Result<Self> {
        credentials.require_passphrase("kucoin")?;
        Ok(Self { credentials })
    }

    /// Prehash is `timestamp + METHOD + path?query + body`
    pub fn sign(&self, timestamp_ms: i64, method: &Method, path: &str, body: &str) -> Result<String> {
        let prehash = format!("{timestamp_ms}{}{path}{body}", method.as_str());
        sign_base64(self.credentials.api_secret.as_bytes(), &prehash)
    }

    /// Key version 2 sends the passphrase HMAC'd with the secret
    pub fn sign_passphrase(&self) -> Result<String> {
        let passphrase = self.credentials.require_passphrase("kucoin")?;
        sign_base64(self.credentials.api_secret.as_bytes(), passphrase)
    }
}

impl RequestAuthenticator for KucoinSigner {
    fn authenticate(&self, spec: &mut RequestSpec, timestamp_ms: i64) -> Result<()> {
        let signature = self.sign(
            timestamp_ms,
            spec.method(),
            &spec.path_and_query(),
            spec.body_string(),
        )?;
        let passphrase = self.sign_passphrase()?;

        spec.set_header("KC-API-KEY", self.credentials.api_key.clone());
        spec.set_header("KC-API-SIGN", signature);
        spec.set_header("KC-API-TIMESTAMP", timestamp_ms.to_string());
        spec.set_header("KC-API-PASSPHRASE", passphrase);
        spec.set_header("KC-API-KEY-VERSION", Self::KEY_VERSION);
        Ok(())
    }
}

/// Bybit `X-BAPI-*` header signing
#[derive(Debug, Clone)]
pub struct BybitSigner {
    credentials: Credentials,
    recv_window_ms: u64,
}

impl BybitSigner {
    pub const DEFAULT_RECV_WINDOW_MS: u64 = 5_000;

    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            recv_window_ms: Self::DEFAULT_RECV_WINDOW_MS,
        }
    }

    pub fn with_recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    pub fn recv_window_ms(&self) -> u64 {
        self.recv_window_ms
    }

    /// Prehash is `timestamp + api_key + recv_window + payload`
    pub fn sign(&self, timestamp_ms: i64, payload: &str) -> Result<String> {
        let prehash = format!(
            "{timestamp_ms}{}{}{payload}",
            self.credentials.api_key, self.recv_window_ms
        );
        sign_hex(self.credentials.api_secret.as_bytes(), &prehash)
    }
}

impl RequestAuthenticator for BybitSigner {
    fn authenticate(&self, spec: &mut RequestSpec, timestamp_ms: i64) -> Result<()> {
        // GET signs the query string, everything else signs the body
        let payload = if spec.method() == Method::GET {
            spec.query_string()
        } else {
            spec.body_string().to_string()
        };
        let signature = self.sign(timestamp_ms, &payload)?;

        spec.set_header("X-BAPI-API-KEY", self.credentials.api_key.clone());
        spec.set_header("X-BAPI-SIGN", signature);
        spec.set_header("X-BAPI-SIGN-TYPE", "2");
        spec.set_header("X-BAPI-TIMESTAMP", timestamp_ms.to_string());
        spec.set_header("X-BAPI-RECV-WINDOW", self.recv_window_ms.to_string());
        Ok(())
    }
}

/// Apex API-key signing for private endpoints
#[derive(Debug, Clone)]
pub struct ApexSigner {
    credentials: Credentials,
    signing_key: String,
}

impl ApexSigner {
    /// Fails when the credentials carry no passphrase
    pub fn new(credentials: Credentials) -> Result<Self> {
        credentials.require_passphrase("apex")?;
        let signing_key = BASE64.encode(credentials.api_secret.as_bytes());
        Ok(Self {
            credentials,
            signing_key,
        })
    }

    /// HMAC key is the base64 of the secret; prehash is
    /// `timestamp + METHOD + path?query + form body`
    pub fn sign(&self, timestamp_ms: i64, method: &Method, path: &str, body: &str) -> Result<String> {
        let prehash = format!("{timestamp_ms}{}{path}{body}", method.as_str());
        sign_base64(self.signing_key.as_bytes(), &prehash)
    }
}

impl RequestAuthenticator for ApexSigner {
    fn authenticate(&self, spec: &mut RequestSpec, timestamp_ms: i64) -> Result<()> {
        let signature = self.sign(
            timestamp_ms,
            spec.method(),
            &spec.path_and_query(),
            spec.body_string(),
        )?;
        let passphrase = self.credentials.require_passphrase("apex")?.to_string();

        spec.set_header("APEX-API-KEY", self.credentials.api_key.clone());
        spec.set_header("APEX-PASSPHRASE", passphrase);
        spec.set_header("APEX-SIGNATURE", signature);
        spec.set_header("APEX-TIMESTAMP", timestamp_ms.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TS: i64 = 1_700_000_000_000;

    fn bybit() -> BybitSigner {
        BybitSigner::new(Credentials::new("test_api_key", "test_secret"))
    }

    fn kucoin() -> KucoinSigner {
        KucoinSigner::new(Credentials::new("kc_key", "kc_secret").with_passphrase("kc_pass")).unwrap()
    }

    #[test]
    fn test_base64_reference_vector() {
        let signature = sign_base64(
            b"chNOOS4KvNXR_Xq4k4c9qsfoKWvnDecLATCRlcBwyKDYnWgO",
            "2020-12-08T09:08:57.715ZGET/api/v5/account/balance",
        )
        .unwrap();
        assert_eq!(signature, "PJ61e1nb2F2Qd7D8SPiaIcx2gjdELc+o0ygzre9z33k=");
    }

    #[rstest]
    #[case(
        "category=linear&symbol=BTCUSDT",
        "fd4f31228a46109dc6673062328693696df9a96c7ff04e6491a45e7f63a0fdd7"
    )]
    #[case(
        r#"{"category": "linear", "symbol": "BTCUSDT", "orderLinkId": "test-order-1"}"#,
        "2df4a0603d69c08d5dea29ba85b46eb7db64ce9e9ebd34a7802a3d69700cb2a1"
    )]
    fn test_bybit_signature(#[case] payload: &str, #[case] expected: &str) {
        assert_eq!(bybit().sign(TS, payload).unwrap(), expected);
    }

    #[test]
    fn test_bybit_signature_is_deterministic() {
        let signer = bybit();
        let first = signer.sign(TS, "symbol=BTCPERP").unwrap();
        let second = signer.sign(TS, "symbol=BTCPERP").unwrap();
        assert_eq!(first, second);
        assert_ne!(first, signer.sign(TS + 1, "symbol=BTCPERP").unwrap());
    }

    #[test]
    fn test_bybit_authenticate_signs_post_body() {
        let mut spec = RequestSpec::post("/perpetual/usdc/openapi/private/v1/cancel-all")
            .json_body(&serde_json::json!({"orderFilter": "Order", "symbol": "BTCPERP"}))
            .unwrap();
        bybit().authenticate(&mut spec, TS).unwrap();

        let headers = spec.headers();
        assert_eq!(headers["X-BAPI-API-KEY"], "test_api_key");
        assert_eq!(headers["X-BAPI-TIMESTAMP"], "1700000000000");
        assert_eq!(headers["X-BAPI-RECV-WINDOW"], "5000");
        assert_eq!(headers["X-BAPI-SIGN-TYPE"], "2");
        assert_eq!(
            headers["X-BAPI-SIGN"],
            "f52d82fd824c26a03eb8ddc4a8c6f6fce494f728c1cf70f28e4d0008aacd8717"
        );
    }

    #[test]
    fn test_bybit_authenticate_signs_get_query() {
        let mut spec = RequestSpec::get("/v5/order/realtime")
            .query("symbol", "BTCUSDT")
            .query("category", "linear");
        bybit().authenticate(&mut spec, TS).unwrap();
        assert_eq!(
            spec.headers()["X-BAPI-SIGN"],
            "fd4f31228a46109dc6673062328693696df9a96c7ff04e6491a45e7f63a0fdd7"
        );
    }

    #[test]
    fn test_kucoin_authenticate_get() {
        let mut spec = RequestSpec::get("/api/v1/accounts").query("currency", "USDT");
        kucoin().authenticate(&mut spec, TS).unwrap();

        let headers = spec.headers();
        assert_eq!(headers["KC-API-KEY"], "kc_key");
        assert_eq!(headers["KC-API-TIMESTAMP"], "1700000000000");
        assert_eq!(headers["KC-API-KEY-VERSION"], "2");
        assert_eq!(
            headers["KC-API-SIGN"],
            "9Ac8/M9i2LTidnN35n143lfHBQFuGtZatTjIogJTCGw="
        );
        assert_eq!(
            headers["KC-API-PASSPHRASE"],
            "ZdlNkHupl0XgrtRHxacjeE27VA1WHUY0poYRP5YoAxQ="
        );
    }

    #[test]
    fn test_kucoin_sign_post_body() {
        let signature = kucoin()
            .sign(
                TS,
                &Method::POST,
                "/api/v1/orders",
                r#"{"clientOid":"abc","side":"buy","symbol":"BTC-USDT"}"#,
            )
            .unwrap();
        assert_eq!(signature, "xhQ4o5BxoOULkBdQpD2tpxgHrzJlHxtY/Vx6mgiDUuQ=");
    }

    #[test]
    fn test_kucoin_requires_passphrase() {
        let err = KucoinSigner::new(Credentials::new("k", "s")).unwrap_err();
        assert!(matches!(err, ExchangeError::Config(_)));
    }

    #[test]
    fn test_apex_signature_uses_base64_secret() {
        let signer =
            ApexSigner::new(Credentials::new("apex_key", "apex_secret").with_passphrase("pp"))
                .unwrap();

        let mut spec = RequestSpec::get("/api/v1/account");
        signer.authenticate(&mut spec, TS).unwrap();
        let headers = spec.headers();
        assert_eq!(headers["APEX-API-KEY"], "apex_key");
        assert_eq!(headers["APEX-PASSPHRASE"], "pp");
        assert_eq!(headers["APEX-TIMESTAMP"], "1700000000000");
        assert_eq!(
            headers["APEX-SIGNATURE"],
            "5pHzz5lPdLHH5p8+zhBi3rskfFYnzIQH5lUw2NV//Qk="
        );

        let form = signer
            .sign(TS, &Method::POST, "/api/v1/transfer", "amount=1&asset=USDC")
            .unwrap();
        assert_eq!(form, "p4GeHbRgFiakIu5sEsSfyIYusn06lF5y830e4QN5r3U=");
    }
}
