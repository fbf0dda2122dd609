/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for cex-rest-adapter tests

#![allow(dead_code)]

use cex_rest_adapter::Credentials;
use serde_json::{Value, json};
use wiremock::{MockServer, ResponseTemplate};

/// Well-known development key; never funded
pub const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn kucoin_credentials() -> Credentials {
    Credentials::new("kc_key", "kc_secret").with_passphrase("kc_pass")
}

pub fn bybit_credentials() -> Credentials {
    Credentials::new("test_api_key", "test_secret")
}

pub fn apex_credentials() -> Credentials {
    Credentials::new("apex_key", "apex_secret").with_passphrase("apex_pass")
}

pub fn apex_ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 0, "msg": "", "data": data}))
}

pub fn bybit_ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"retCode": 0, "retMsg": "OK", "result": result}))
}

pub fn kucoin_ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": "200000", "data": data}))
}
