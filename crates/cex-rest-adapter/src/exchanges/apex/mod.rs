/*
[INPUT]:  Apex v1 REST API
[OUTPUT]: ApexClient with market, onboarding and account endpoints
[POS]:    Apex adapter - module wiring
[UPDATE]: When Apex modules or exports change
*/

pub mod account;
pub mod client;
pub mod market;
pub mod types;

pub use client::{APEX_BASE_URL, ApexClient};
pub use market::VALID_INTERVALS;
pub use types::*;
