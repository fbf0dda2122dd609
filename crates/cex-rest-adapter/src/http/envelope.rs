/*
[INPUT]:  Raw JSON response bodies from each exchange
[OUTPUT]: Typed payload or a domain error carrying the exchange's code/message
[POS]:    HTTP layer - response envelope decoding
[UPDATE]: When an exchange changes its envelope field names or success code
*/

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::http::{ExchangeError, Result};

/// Exchange response wrapper: payload plus status code and message
pub trait Envelope: DeserializeOwned {
    type Payload;

    /// Unwrap the payload, surfacing an embedded error code as [`ExchangeError::Api`]
    fn into_result(self) -> Result<Self::Payload>;

    /// Check the status only, discarding any payload
    fn into_unit(self) -> Result<()>;
}

/// Error only when the code is set and a message accompanies it
fn check_code(failed: bool, code: i64, message: &str) -> Result<()> {
    if failed && !message.is_empty() {
        return Err(ExchangeError::Api {
            code,
            message: message.to_string(),
        });
    }
    Ok(())
}

fn require_payload<T>(payload: Option<T>) -> Result<T> {
    payload.ok_or_else(|| ExchangeError::InvalidResponse("envelope carried no payload".into()))
}

/// `{ "code": 0, "msg": "", "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApexEnvelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

impl<T: DeserializeOwned> Envelope for ApexEnvelope<T> {
    type Payload = T;

    fn into_result(self) -> Result<T> {
        check_code(self.code != 0, self.code, &self.msg)?;
        require_payload(self.data)
    }

    fn into_unit(self) -> Result<()> {
        check_code(self.code != 0, self.code, &self.msg)
    }
}

/// `{ "retCode": 0, "retMsg": "OK", "result": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BybitEnvelope<T> {
    pub result: Option<T>,
    #[serde(default, rename = "retCode", alias = "ret_code")]
    pub ret_code: i64,
    #[serde(default, rename = "retMsg", alias = "ret_msg")]
    pub ret_msg: String,
}

impl<T: DeserializeOwned> Envelope for BybitEnvelope<T> {
    type Payload = T;

    fn into_result(self) -> Result<T> {
        check_code(self.ret_code != 0, self.ret_code, &self.ret_msg)?;
        require_payload(self.result)
    }

    fn into_unit(self) -> Result<()> {
        check_code(self.ret_code != 0, self.ret_code, &self.ret_msg)
    }
}

/// KuCoin success code
pub const KUCOIN_SUCCESS_CODE: &str = "200000";

/// `{ "code": "200000", "msg": "", "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KucoinEnvelope<T> {
    pub data: Option<T>,
    #[serde(default = "default_kucoin_code")]
    pub code: String,
    #[serde(default)]
    pub msg: String,
}

fn default_kucoin_code() -> String {
    KUCOIN_SUCCESS_CODE.to_string()
}

impl<T> KucoinEnvelope<T> {
    fn check(&self) -> Result<()> {
        let failed = self.code != KUCOIN_SUCCESS_CODE;
        check_code(failed, self.code.parse().unwrap_or(0), &self.msg)
    }
}

impl<T: DeserializeOwned> Envelope for KucoinEnvelope<T> {
    type Payload = T;

    fn into_result(self) -> Result<T> {
        self.check()?;
        require_payload(self.data)
    }

    fn into_unit(self) -> Result<()> {
        self.check()
    }
}
