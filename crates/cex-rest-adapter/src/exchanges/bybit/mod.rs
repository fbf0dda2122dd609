/*
[INPUT]:  Bybit USDC perpetual REST API
[OUTPUT]: BybitClient with market and trading endpoints
[POS]:    Bybit adapter - module wiring
[UPDATE]: When Bybit modules or exports change
*/

pub mod client;
pub mod market;
pub mod trade;
pub mod types;

pub use client::{BYBIT_BASE_URL, BybitClient};
pub use market::{VALID_INTERVALS, VALID_PERIODS};
pub use types::*;
