/*
[INPUT]:  Bybit USDC perpetual REST payload schemas
[OUTPUT]: Typed Rust structs for Bybit market data and orders
[POS]:    Bybit adapter - data layer
[UPDATE]: When Bybit changes a payload schema
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::types::models::serde_helpers;
use crate::types::{OrderType, Side};

/// One `order-book` row; bids and asks arrive interleaved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderbookEntry {
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub size: Decimal,
    pub side: String,
}

/// `symbols`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contract {
    pub symbol: String,
    pub status: String,
    pub base_coin: String,
    pub quote_coin: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub taker_fee_rate: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub maker_fee_rate: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub min_leverage: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub max_leverage: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub leverage_step: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub min_price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub max_price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub tick_size: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub max_trading_qty: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub min_trading_qty: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub qty_step: Decimal,
    #[serde(deserialize_with = "serde_helpers::i64_lenient")]
    pub delivery_time: i64,
}

/// `tick`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SymbolTicker {
    pub symbol: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub bid: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub ask: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub last_price: Decimal,
    pub last_tick_direction: String,
    #[serde(rename = "prevPrice24h", deserialize_with = "serde_helpers::decimal_or_zero")]
    pub prev_price_24h: Decimal,
    #[serde(rename = "price24hPcnt", deserialize_with = "serde_helpers::decimal_or_zero")]
    pub price_24h_pcnt: Decimal,
    #[serde(rename = "highPrice24h", deserialize_with = "serde_helpers::decimal_or_zero")]
    pub high_price_24h: Decimal,
    #[serde(rename = "lowPrice24h", deserialize_with = "serde_helpers::decimal_or_zero")]
    pub low_price_24h: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub mark_price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub index_price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub open_interest: Decimal,
    #[serde(rename = "turnover24h", deserialize_with = "serde_helpers::decimal_or_zero")]
    pub turnover_24h: Decimal,
    #[serde(rename = "volume24h", deserialize_with = "serde_helpers::decimal_or_zero")]
    pub volume_24h: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub funding_rate: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub predicted_funding_rate: Decimal,
    pub next_funding_time: String,
}

/// Which price series `kline` endpoints return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KlineKind {
    Trade,
    Mark,
    Index,
    Premium,
}

impl KlineKind {
    pub(crate) fn path(self) -> &'static str {
        match self {
            KlineKind::Trade => "/kline/list",
            KlineKind::Mark => "/mark-price-kline",
            KlineKind::Index => "/index-price-kline",
            KlineKind::Premium => "/premium-index-kline",
        }
    }
}

impl std::str::FromStr for KlineKind {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "trade" => Ok(KlineKind::Trade),
            "mark" => Ok(KlineKind::Mark),
            "index" => Ok(KlineKind::Index),
            "premium" => Ok(KlineKind::Premium),
            other => Err(format!("unknown kline kind `{other}`")),
        }
    }
}

/// Candlestick; mark, index and premium series carry no volume or turnover
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Kline {
    pub symbol: String,
    pub period: String,
    /// Unix seconds
    #[serde(deserialize_with = "serde_helpers::i64_lenient")]
    pub open_time: i64,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub open: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub high: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub low: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub close: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub volume: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub turnover: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenInterest {
    pub symbol: String,
    #[serde(deserialize_with = "serde_helpers::i64_lenient")]
    pub timestamp: i64,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub open_interest: Decimal,
}

/// `big-deal`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LargeOrder {
    pub symbol: String,
    pub side: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub exec_price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub exec_qty: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub exec_value: Decimal,
    #[serde(deserialize_with = "serde_helpers::i64_lenient")]
    pub exec_time: i64,
}

/// `account-ratio`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountRatio {
    pub symbol: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub buy_ratio: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub sell_ratio: Decimal,
    #[serde(deserialize_with = "serde_helpers::i64_lenient")]
    pub timestamp: i64,
}

/// `query-trade-latest` row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LatestTrade {
    pub id: String,
    pub symbol: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub order_price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub order_qty: Decimal,
    pub side: String,
    #[serde(deserialize_with = "serde_helpers::i64_lenient")]
    pub time: i64,
}

/// Cursor-paged list wrapper used by the USDC list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub result_total_size: i64,
    #[serde(default = "Vec::new")]
    pub data_list: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            cursor: String::new(),
            result_total_size: 0,
            data_list: Vec::new(),
        }
    }
}

fn titlecase_side<S: Serializer>(side: &Side, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(side.as_titlecase())
}

fn titlecase_order_type<S: Serializer>(
    order_type: &OrderType,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(order_type.as_titlecase())
}

/// Body of `place-order`
///
/// Decimals serialise as strings; the three flags are always sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub symbol: String,
    #[serde(serialize_with = "titlecase_order_type")]
    pub order_type: OrderType,
    pub order_filter: String,
    #[serde(serialize_with = "titlecase_side")]
    pub side: Side,
    pub order_qty: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_link_id: Option<String>,
    pub reduce_only: bool,
    pub close_on_trigger: bool,
    pub mmp: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    #[serde(rename = "tptriggerby", skip_serializing_if = "Option::is_none")]
    pub tp_trigger_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_trigger_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_by: Option<String>,
}

impl PlaceOrderRequest {
    /// Plain order with only the required fields set
    pub fn new(
        symbol: impl Into<String>,
        order_type: OrderType,
        side: Side,
        order_qty: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            order_type,
            order_filter: "Order".to_string(),
            side,
            order_qty,
            order_price: None,
            time_in_force: None,
            order_link_id: None,
            reduce_only: false,
            close_on_trigger: false,
            mmp: false,
            take_profit: None,
            stop_loss: None,
            tp_trigger_by: None,
            sl_trigger_by: None,
            trigger_price: None,
            trigger_by: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.order_price = Some(price);
        self
    }

    pub fn with_order_link_id(mut self, id: impl Into<String>) -> Self {
        self.order_link_id = Some(id.into());
        self
    }
}

/// Body of `replace-order`; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyOrderRequest {
    pub symbol: String,
    pub order_filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_link_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_qty: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    #[serde(rename = "tptriggerby", skip_serializing_if = "Option::is_none")]
    pub tp_trigger_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_trigger_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
}

/// Filters shared by the active-order, order-history and execution queries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_link_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl OrderQuery {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: String,
    pub order_link_id: String,
    pub symbol: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub order_price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub order_qty: Decimal,
    pub order_type: String,
    pub side: String,
}

/// Active or historical order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsdcOrder {
    pub order_id: String,
    pub order_link_id: String,
    pub symbol: String,
    pub order_type: String,
    pub side: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub qty: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub cum_exec_qty: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub cum_exec_value: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub cum_exec_fee: Decimal,
    pub order_status: String,
    pub time_in_force: String,
    pub order_filter: String,
    pub reduce_only: bool,
    pub close_on_trigger: bool,
    #[serde(deserialize_with = "serde_helpers::i64_lenient")]
    pub created_at: i64,
    #[serde(deserialize_with = "serde_helpers::i64_lenient")]
    pub updated_at: i64,
}

/// Execution record from `execution-list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsdcExecution {
    pub trade_id: String,
    pub order_id: String,
    pub order_link_id: String,
    pub symbol: String,
    pub side: String,
    pub exec_type: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub exec_price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub exec_qty: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub exec_fee: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub fee_rate: Decimal,
    #[serde(deserialize_with = "serde_helpers::i64_lenient")]
    pub trade_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_place_order_wire_shape() {
        let order = PlaceOrderRequest::new(
            "BTCPERP",
            OrderType::Limit,
            Side::Buy,
            Decimal::from_str("0.01").unwrap(),
        )
        .with_price(Decimal::from_str("29000.5").unwrap());

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["orderType"], "Limit");
        assert_eq!(value["side"], "Buy");
        assert_eq!(value["orderQty"], "0.01");
        assert_eq!(value["orderPrice"], "29000.5");
        assert_eq!(value["reduceOnly"], false);
        assert_eq!(value["mmp"], false);
        assert!(value.get("takeProfit").is_none());
    }

    #[test]
    fn test_kline_accepts_string_open_time() {
        let kline: Kline = serde_json::from_str(
            r#"{"symbol":"BTCPERP","period":"5","openTime":"1645766400","open":"1","high":"2","low":"0.5","close":"1.5"}"#,
        )
        .unwrap();
        assert_eq!(kline.open_time, 1_645_766_400);
        assert!(kline.volume.is_zero());
    }

    #[test]
    fn test_kline_kind_from_str() {
        assert_eq!(KlineKind::from_str("Mark").unwrap(), KlineKind::Mark);
        assert_eq!(KlineKind::Premium.path(), "/premium-index-kline");
        assert!(KlineKind::from_str("spot").is_err());
    }

    #[test]
    fn test_page_defaults_missing_list() {
        let page: Page<UsdcOrder> = serde_json::from_str(r#"{"cursor":"c1"}"#).unwrap();
        assert_eq!(page.cursor, "c1");
        assert!(page.data_list.is_empty());
    }
}
