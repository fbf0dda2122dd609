/*
[INPUT]:  Raw `[price, size]` string pairs from exchange depth endpoints
[OUTPUT]: Normalised orderbook snapshots with decimal levels
[POS]:    Data layer - models shared by every exchange client
[UPDATE]: When adding shared models
*/

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::http::{ExchangeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderbookLevel {
    pub price: Decimal,
    pub size: Decimal,
}

impl OrderbookLevel {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }

    /// Parse a `[price, size]` pair as sent by Apex and KuCoin
    pub fn from_pair(pair: &[String; 2]) -> Result<Self> {
        Ok(Self {
            price: parse_decimal("price", &pair[0])?,
            size: parse_decimal("size", &pair[1])?,
        })
    }
}

/// Snapshot of one side-sorted orderbook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orderbook {
    pub symbol: String,
    pub bids: Vec<OrderbookLevel>,
    pub asks: Vec<OrderbookLevel>,
    /// Exchange timestamp in milliseconds, when the exchange sends one
    pub timestamp_ms: Option<i64>,
}

impl Orderbook {
    pub fn from_pairs(
        symbol: impl Into<String>,
        bids: &[[String; 2]],
        asks: &[[String; 2]],
        timestamp_ms: Option<i64>,
    ) -> Result<Self> {
        Ok(Self {
            symbol: symbol.into(),
            bids: bids.iter().map(OrderbookLevel::from_pair).collect::<Result<_>>()?,
            asks: asks.iter().map(OrderbookLevel::from_pair).collect::<Result<_>>()?,
            timestamp_ms,
        })
    }

    pub fn best_bid(&self) -> Option<&OrderbookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&OrderbookLevel> {
        self.asks.first()
    }
}

pub(crate) fn parse_decimal(field: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| ExchangeError::InvalidResponse(format!("bad decimal {field} `{raw}`: {e}")))
}

/// Field deserializers for exchanges that mix strings, numbers and nulls
pub(crate) mod serde_helpers {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    /// `"1.5"`, `1.5`, `""` and `null` all decode; the last two as zero
    pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(Decimal::ZERO),
            Value::String(raw) if raw.trim().is_empty() => Ok(Decimal::ZERO),
            Value::String(raw) => Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .map_err(serde::de::Error::custom),
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!("invalid decimal {other}"))),
        }
    }

    /// Integer sent either as a JSON number or a numeric string
    pub fn i64_lenient<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(0),
            Value::String(raw) if raw.trim().is_empty() => Ok(0),
            Value::String(raw) => raw.trim().parse().map_err(serde::de::Error::custom),
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| serde::de::Error::custom(format!("integer out of range {n}"))),
            other => Err(serde::de::Error::custom(format!("invalid integer {other}"))),
        }
    }
}
