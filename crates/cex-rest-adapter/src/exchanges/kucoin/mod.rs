/*
[INPUT]:  KuCoin spot REST API
[OUTPUT]: KucoinClient with market, trading and account endpoints
[POS]:    KuCoin adapter - module wiring
[UPDATE]: When KuCoin modules or exports change
*/

pub mod client;
pub mod market;
pub mod trade;
pub mod types;

pub use client::{KUCOIN_BASE_URL, KucoinClient};
pub use market::VALID_PERIODS;
pub use types::*;
