/*
[INPUT]:  Apex v1 REST payload schemas
[OUTPUT]: Typed Rust structs for Apex market data and onboarding
[POS]:    Apex adapter - data layer
[UPDATE]: When Apex changes a payload schema
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Side;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemTime {
    pub time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrencyConfig {
    pub id: String,
    pub step_size: Decimal,
    pub show_step: Decimal,
    pub icon_url: String,
    pub starkex_asset_id: String,
    pub starkex_resolution: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContractConfig {
    pub symbol: String,
    pub symbol_display_name: String,
    pub settle_currency_id: String,
    pub underlying_currency_id: String,
    pub tick_size: Decimal,
    pub step_size: Decimal,
    pub min_order_size: Decimal,
    pub max_order_size: Decimal,
    pub max_position_size: Decimal,
    pub default_leverage: Decimal,
    pub enable_trade: bool,
    pub enable_display: bool,
}

/// `/symbols`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllConfig {
    pub currency: Vec<CurrencyConfig>,
    pub perpetual_contract: Vec<ContractConfig>,
}

/// `/depth` payload before conversion to [`crate::types::Orderbook`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthData {
    #[serde(rename = "a", alias = "asks", default)]
    pub asks: Vec<[String; 2]>,
    #[serde(rename = "b", alias = "bids", default)]
    pub bids: Vec<[String; 2]>,
    #[serde(rename = "s", default)]
    pub symbol: String,
    #[serde(rename = "u", default)]
    pub update_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeData {
    #[serde(rename = "S")]
    pub side: Side,
    #[serde(rename = "v")]
    pub size: Decimal,
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "T")]
    pub time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlineData {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "i")]
    pub interval: String,
    #[serde(rename = "t")]
    pub start: i64,
    #[serde(rename = "o")]
    pub open: Decimal,
    #[serde(rename = "h")]
    pub high: Decimal,
    #[serde(rename = "l")]
    pub low: Decimal,
    #[serde(rename = "c")]
    pub close: Decimal,
    #[serde(rename = "v")]
    pub volume: Decimal,
    #[serde(rename = "tr", default)]
    pub turnover: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TickerData {
    pub symbol: String,
    pub price_24h_pcnt: Decimal,
    pub last_price: Decimal,
    pub high_price_24h: Decimal,
    pub low_price_24h: Decimal,
    pub mark_price: Decimal,
    pub index_price: Decimal,
    pub open_interest: Decimal,
    pub turnover_24h: Decimal,
    pub volume_24h: Decimal,
    pub funding_rate: Decimal,
    pub predicted_funding_rate: Decimal,
    pub next_funding_time: String,
    pub trade_count: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FundingRate {
    pub symbol: String,
    pub rate: Decimal,
    pub price: Decimal,
    pub funding_time: i64,
    pub funding_timestamp: i64,
}

/// `/history-funding`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FundingHistory {
    pub history_funds: Vec<FundingRate>,
    pub total_size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NonceData {
    pub nonce: String,
    pub nonce_expired: i64,
}

/// Parameters for `/onboarding`
///
/// The Stark key pair is derived by the caller; it is sent as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingRequest {
    pub stark_key: String,
    pub stark_key_y_coordinate: String,
    pub eth_address: String,
    pub chain_id: u64,
    pub referred_by_affiliate_link: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiKeyData {
    pub key: String,
    pub passphrase: String,
    pub secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserData {
    pub ethereum_address: String,
    pub is_registered: bool,
    pub email: String,
    pub username: String,
    pub referral_code: String,
    pub is_email_verified: bool,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountData {
    pub id: String,
    pub stark_key: String,
    pub position_id: String,
    pub ethereum_address: String,
    pub taker_fee_rate: Decimal,
    pub maker_fee_rate: Decimal,
    pub created_at: i64,
}

/// `/onboarding` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OnboardingData {
    pub api_key: Option<ApiKeyData>,
    pub user: Option<UserData>,
    pub account: Option<AccountData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_field_names() {
        let ticker: TickerData = serde_json::from_str(
            r#"{"symbol":"BTCUSDC","price24hPcnt":"0.01","lastPrice":"29000","highPrice24h":"29500","volume24h":"12.5"}"#,
        )
        .unwrap();
        assert_eq!(ticker.symbol, "BTCUSDC");
        assert_eq!(ticker.high_price_24h.to_string(), "29500");
        assert_eq!(ticker.volume_24h.to_string(), "12.5");
        assert!(ticker.mark_price.is_zero());
    }

    #[test]
    fn test_trade_short_keys() {
        let trade: TradeData = serde_json::from_str(
            r#"{"S":"Buy","v":"0.001","p":"29000","s":"BTCUSDC","T":1647502440973}"#,
        )
        .unwrap();
        assert_eq!(trade.side, Side::Buy);
        assert_eq!(trade.symbol, "BTCUSDC");
        assert_eq!(trade.time, 1_647_502_440_973);
    }
}
