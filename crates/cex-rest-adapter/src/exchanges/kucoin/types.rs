/*
[INPUT]:  KuCoin spot REST payload schemas
[OUTPUT]: Typed Rust structs for KuCoin market data, orders and accounts
[POS]:    KuCoin adapter - data layer
[UPDATE]: When KuCoin changes a payload schema
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::http::{ExchangeError, Result, require_non_empty, require_positive};
use crate::types::models::{parse_decimal, serde_helpers};
use crate::types::{OrderType, Side};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub fee_currency: String,
    pub market: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub base_min_size: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub quote_min_size: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub base_max_size: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub quote_max_size: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub base_increment: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub quote_increment: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub price_increment: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub min_funds: Decimal,
    pub is_margin_enabled: bool,
    pub enable_trading: bool,
}

/// Level-1 ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ticker {
    pub sequence: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub size: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub best_bid: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub best_bid_size: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub best_ask: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub best_ask_size: Decimal,
    pub time: i64,
}

/// 24h statistics; also the row type of `allTickers`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TickerStats {
    pub time: i64,
    pub symbol: String,
    pub symbol_name: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub buy: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub sell: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub change_rate: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub change_price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub high: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub low: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub vol: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub vol_value: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub last: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub average_price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub taker_fee_rate: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub maker_fee_rate: Decimal,
}

/// `allTickers`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllTickers {
    pub time: i64,
    pub ticker: Vec<TickerStats>,
}

/// Depth payload before conversion to [`crate::types::Orderbook`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthData {
    pub sequence: String,
    pub time: i64,
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trade {
    pub sequence: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub size: Decimal,
    pub side: String,
    /// Nanoseconds
    pub time: i64,
}

/// Candle decoded from KuCoin's `[time, open, close, high, low, volume, amount]` rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// Unix seconds
    pub start_time: i64,
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub volume: Decimal,
    pub amount: Decimal,
}

impl Kline {
    pub fn from_row(row: &[String; 7]) -> Result<Self> {
        let start_time = row[0].parse().map_err(|e| {
            ExchangeError::InvalidResponse(format!("bad candle time `{}`: {e}", row[0]))
        })?;
        Ok(Self {
            start_time,
            open: parse_decimal("open", &row[1])?,
            close: parse_decimal("close", &row[2])?,
            high: parse_decimal("high", &row[3])?,
            low: parse_decimal("low", &row[4])?,
            volume: parse_decimal("volume", &row[5])?,
            amount: parse_decimal("amount", &row[6])?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Currency {
    pub currency: String,
    pub name: String,
    pub full_name: String,
    pub precision: u32,
    pub confirms: Option<u32>,
    pub contract_address: Option<String>,
    pub is_margin_enabled: bool,
    pub is_debit_enabled: bool,
}

/// `status`: `open`, `close` or `cancelonly`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceStatus {
    pub status: String,
    pub msg: String,
}

/// New spot order
///
/// An unset `order_type` means limit. Limit orders need a price and a size;
/// market orders need a size or funds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderRequest {
    pub client_oid: String,
    pub side: Option<Side>,
    pub symbol: String,
    pub order_type: Option<OrderType>,
    pub remark: Option<String>,
    pub stp: Option<String>,
    pub price: Option<Decimal>,
    pub size: Option<Decimal>,
    pub funds: Option<Decimal>,
    pub time_in_force: Option<String>,
    pub cancel_after: Option<u64>,
    pub post_only: bool,
    pub hidden: bool,
    pub iceberg: bool,
    pub visible_size: Option<Decimal>,
}

impl OrderRequest {
    /// Limit order with a fresh client order id
    pub fn limit(symbol: impl Into<String>, side: Side, price: Decimal, size: Decimal) -> Self {
        Self {
            client_oid: Uuid::new_v4().to_string(),
            side: Some(side),
            symbol: symbol.into(),
            order_type: Some(OrderType::Limit),
            price: Some(price),
            size: Some(size),
            ..Self::default()
        }
    }

    /// Market order by base size with a fresh client order id
    pub fn market(symbol: impl Into<String>, side: Side, size: Decimal) -> Self {
        Self {
            client_oid: Uuid::new_v4().to_string(),
            side: Some(side),
            symbol: symbol.into(),
            order_type: Some(OrderType::Market),
            size: Some(size),
            ..Self::default()
        }
    }

    /// Validate and render the JSON body sent to `POST /api/v1/orders`
    pub fn to_body(&self) -> Result<Value> {
        require_non_empty("clientOid", &self.client_oid)?;
        let side = self
            .side
            .ok_or_else(|| ExchangeError::validation("side", "must not be empty"))?;
        require_non_empty("symbol", &self.symbol)?;

        let mut body = Map::new();
        body.insert("clientOid".into(), json!(self.client_oid));
        body.insert("side".into(), json!(side.as_lowercase()));
        body.insert("symbol".into(), json!(self.symbol));
        if let Some(remark) = self.remark.as_ref().filter(|r| !r.is_empty()) {
            body.insert("remark".into(), json!(remark));
        }
        if let Some(stp) = self.stp.as_ref().filter(|s| !s.is_empty()) {
            body.insert("stp".into(), json!(stp));
        }

        match self.order_type {
            None | Some(OrderType::Limit) => {
                let price = self
                    .price
                    .ok_or_else(|| ExchangeError::validation("price", "must not be empty"))?;
                require_positive("price", price)?;
                let size = self.size.unwrap_or_default();
                require_positive("size", size)?;

                body.insert("price".into(), json!(price.to_string()));
                body.insert("size".into(), json!(size.to_string()));
                if let Some(tif) = self.time_in_force.as_ref().filter(|t| !t.is_empty()) {
                    body.insert("timeInForce".into(), json!(tif));
                    if tif == "GTT" {
                        if let Some(after) = self.cancel_after.filter(|a| *a > 0) {
                            body.insert("cancelAfter".into(), json!(after));
                        }
                    }
                }
                body.insert("postOnly".into(), json!(self.post_only));
                body.insert("hidden".into(), json!(self.hidden));
                body.insert("iceberg".into(), json!(self.iceberg));
                if let Some(visible) = self.visible_size.filter(|v| *v > Decimal::ZERO) {
                    body.insert("visibleSize".into(), json!(visible.to_string()));
                }
            }
            Some(OrderType::Market) => {
                let size = self.size.filter(|s| *s > Decimal::ZERO);
                let funds = self.funds.filter(|f| *f > Decimal::ZERO);
                match (size, funds) {
                    (Some(size), _) => body.insert("size".into(), json!(size.to_string())),
                    (None, Some(funds)) => body.insert("funds".into(), json!(funds.to_string())),
                    (None, None) => {
                        return Err(ExchangeError::validation(
                            "size",
                            "market orders need a positive size or funds",
                        ));
                    }
                };
            }
        }

        if let Some(order_type) = self.order_type {
            body.insert("type".into(), json!(order_type.as_lowercase()));
        }
        Ok(Value::Object(body))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CancelledOrders {
    pub cancelled_order_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CancelledByClientOid {
    pub cancelled_order_id: String,
    pub client_oid: String,
}

/// Page-numbered list wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    #[serde(default)]
    pub current_page: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub total_num: i64,
    #[serde(default)]
    pub total_page: i64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: String,
    pub symbol: String,
    pub op_type: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub size: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub funds: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub deal_funds: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub deal_size: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub fee: Decimal,
    pub fee_currency: String,
    pub stp: String,
    pub time_in_force: String,
    pub post_only: bool,
    pub hidden: bool,
    pub iceberg: bool,
    pub client_oid: String,
    pub remark: Option<String>,
    pub is_active: bool,
    pub cancel_exist: bool,
    pub created_at: i64,
    pub trade_type: String,
}

/// Filters for `GET /api/v1/orders`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdersQuery {
    pub status: Option<String>,
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub trade_type: Option<String>,
    /// Milliseconds
    pub start_at: Option<i64>,
    /// Milliseconds
    pub end_at: Option<i64>,
}

/// One execution against an order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fill {
    pub symbol: String,
    pub trade_id: String,
    pub order_id: String,
    pub counter_order_id: String,
    pub side: String,
    /// `taker` or `maker`
    pub liquidity: String,
    pub force_taker: bool,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub price: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub size: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub funds: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub fee: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub fee_rate: Decimal,
    pub fee_currency: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub created_at: i64,
    pub trade_type: String,
}

/// Filters for `GET /api/v1/fills`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillsQuery {
    pub order_id: Option<String>,
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub trade_type: Option<String>,
    /// Milliseconds
    pub start_at: Option<i64>,
    /// Milliseconds
    pub end_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountInfo {
    pub id: String,
    pub currency: String,
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub balance: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub available: Decimal,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub holds: Decimal,
}
