/*
[INPUT]:  Exchange wire spellings of order side and order type
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - enums shared by every exchange client
[UPDATE]: When an exchange introduces a new spelling or variant
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Order side; accepts `buy`, `Buy` and `BUY` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "buy", alias = "Buy", alias = "BUY")]
    Buy,
    #[serde(rename = "sell", alias = "Sell", alias = "SELL")]
    Sell,
}

impl Side {
    /// KuCoin spelling
    pub fn as_lowercase(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }

    /// Bybit spelling
    pub fn as_titlecase(self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "limit", alias = "Limit", alias = "LIMIT")]
    Limit,
    #[serde(rename = "market", alias = "Market", alias = "MARKET")]
    Market,
}

impl OrderType {
    pub fn as_lowercase(self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }

    pub fn as_titlecase(self) -> &'static str {
        match self {
            OrderType::Limit => "Limit",
            OrderType::Market => "Market",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("\"buy\"", Side::Buy)]
    #[case("\"Buy\"", Side::Buy)]
    #[case("\"SELL\"", Side::Sell)]
    fn test_side_accepts_exchange_spellings(#[case] raw: &str, #[case] expected: Side) {
        let side: Side = serde_json::from_str(raw).unwrap();
        assert_eq!(side, expected);
    }

    #[test]
    fn test_side_spellings() {
        assert_eq!(Side::Buy.as_titlecase(), "Buy");
        assert_eq!(Side::Sell.to_string(), "sell");
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"sell\"");
    }
}
