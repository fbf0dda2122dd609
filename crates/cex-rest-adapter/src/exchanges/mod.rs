/*
[INPUT]:  Shared dispatcher, signers and rate limiter
[OUTPUT]: Typed per-exchange REST clients
[POS]:    Exchange adapters - module wiring
[UPDATE]: When adding an exchange
*/

pub mod apex;
pub mod bybit;
pub mod kucoin;

pub use apex::ApexClient;
pub use bybit::BybitClient;
pub use kucoin::KucoinClient;
