/*
[INPUT]:  Symbols, periods and paging parameters
[OUTPUT]: Bybit USDC perpetual market data
[POS]:    Bybit adapter - public market data endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use chrono::{DateTime, Utc};

use super::client::{BybitClient, OPTION_PUBLIC, PERPETUAL_PUBLIC, check_limit};
use super::types::{
    AccountRatio, Contract, Kline, KlineKind, LargeOrder, LatestTrade, OpenInterest,
    OrderbookEntry, Page, SymbolTicker,
};
use crate::http::{ExchangeError, RequestSpec, Result, require_non_empty, require_one_of};
use crate::types::{Orderbook, OrderbookLevel};

/// Kline periods accepted by the USDC kline endpoints
pub const VALID_INTERVALS: &[&str] = &[
    "1", "3", "5", "15", "30", "60", "120", "240", "360", "720", "D", "W", "M",
];

/// Aggregation periods for open interest and long/short ratio
pub const VALID_PERIODS: &[&str] = &["5min", "15min", "30min", "1h", "4h", "1d"];

const VALID_DIRECTIONS: &[&str] = &["prev", "next"];

fn public_path(path: &str) -> String {
    format!("{PERPETUAL_PUBLIC}{path}")
}

impl BybitClient {
    /// Depth snapshot split into bids and asks
    ///
    /// GET .../order-book?symbol={symbol}
    pub async fn get_orderbook(&self, symbol: &str) -> Result<Orderbook> {
        require_non_empty("symbol", symbol)?;
        let spec = RequestSpec::get(public_path("/order-book")).query("symbol", symbol);
        let entries: Vec<OrderbookEntry> = self.public(spec).await?;
        split_orderbook(symbol, entries)
    }

    /// Contract specifications, optionally for one symbol
    ///
    /// GET .../symbols
    pub async fn get_contracts(
        &self,
        symbol: Option<&str>,
        direction: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Contract>> {
        if let Some(direction) = direction {
            require_one_of("direction", direction, VALID_DIRECTIONS)?;
        }
        check_limit(limit, 200)?;

        let spec = RequestSpec::get(public_path("/symbols"))
            .query_opt("symbol", symbol.filter(|s| !s.is_empty()))
            .query_opt("direction", direction)
            .query_opt("limit", limit);
        self.public(spec).await
    }

    /// GET .../tick?symbol={symbol}
    pub async fn get_symbol_ticker(&self, symbol: &str) -> Result<SymbolTicker> {
        require_non_empty("symbol", symbol)?;
        self.public(RequestSpec::get(public_path("/tick")).query("symbol", symbol))
            .await
    }

    /// Candlesticks of the chosen price series starting at `start`
    pub async fn get_klines(
        &self,
        kind: KlineKind,
        symbol: &str,
        period: &str,
        start: DateTime<Utc>,
        limit: Option<u32>,
    ) -> Result<Vec<Kline>> {
        require_non_empty("symbol", symbol)?;
        require_one_of("period", period, VALID_INTERVALS)?;
        if start.timestamp() <= 0 {
            return Err(ExchangeError::validation("startTime", "must be after the epoch"));
        }
        check_limit(limit, 200)?;

        let spec = RequestSpec::get(public_path(kind.path()))
            .query("symbol", symbol)
            .query("period", period)
            .query("startTime", start.timestamp())
            .query_opt("limit", limit);
        self.public(spec).await
    }

    /// GET .../open-interest
    pub async fn get_open_interest(
        &self,
        symbol: &str,
        period: &str,
        limit: Option<u32>,
    ) -> Result<Vec<OpenInterest>> {
        require_non_empty("symbol", symbol)?;
        require_one_of("period", period, VALID_PERIODS)?;
        check_limit(limit, 200)?;

        let spec = RequestSpec::get(public_path("/open-interest"))
            .query("symbol", symbol)
            .query("period", period)
            .query_opt("limit", limit);
        self.public(spec).await
    }

    /// GET .../big-deal
    pub async fn get_large_orders(&self, symbol: &str, limit: Option<u32>) -> Result<Vec<LargeOrder>> {
        require_non_empty("symbol", symbol)?;
        check_limit(limit, 100)?;

        let spec = RequestSpec::get(public_path("/big-deal"))
            .query("symbol", symbol)
            .query_opt("limit", limit);
        self.public(spec).await
    }

    /// Long/short account ratio
    ///
    /// GET .../account-ratio
    pub async fn get_account_ratio(
        &self,
        symbol: &str,
        period: &str,
        limit: Option<u32>,
    ) -> Result<Vec<AccountRatio>> {
        require_non_empty("symbol", symbol)?;
        require_one_of("period", period, VALID_PERIODS)?;
        check_limit(limit, 500)?;

        let spec = RequestSpec::get(public_path("/account-ratio"))
            .query("symbol", symbol)
            .query("period", period)
            .query_opt("limit", limit);
        self.public(spec).await
    }

    /// Most recent public trades of a category
    ///
    /// GET /option/usdc/openapi/public/v1/query-trade-latest
    pub async fn get_latest_trades(
        &self,
        category: &str,
        symbol: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<LatestTrade>> {
        require_non_empty("category", category)?;
        check_limit(limit, 500)?;

        let spec = RequestSpec::get(format!("{OPTION_PUBLIC}/query-trade-latest"))
            .query("category", category)
            .query_opt("symbol", symbol.filter(|s| !s.is_empty()))
            .query_opt("limit", limit);
        let page: Page<LatestTrade> = self.public(spec).await?;
        Ok(page.data_list)
    }
}

fn split_orderbook(symbol: &str, entries: Vec<OrderbookEntry>) -> Result<Orderbook> {
    let mut book = Orderbook {
        symbol: symbol.to_string(),
        ..Orderbook::default()
    };
    for entry in entries {
        let level = OrderbookLevel::new(entry.price, entry.size);
        match entry.side.as_str() {
            "Buy" => book.bids.push(level),
            "Sell" => book.asks.push(level),
            other => {
                return Err(ExchangeError::InvalidResponse(format!(
                    "orderbook entry with unknown side `{other}`"
                )));
            }
        }
    }
    Ok(book)
}

#[cfg(test)]
mod tests {
    use crate::exchanges::bybit::{BybitClient, KlineKind};
    use crate::http::{ClientConfig, ExchangeError};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> BybitClient {
        BybitClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
    }

    fn ok(result: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"retCode": 0, "retMsg": "", "result": result}))
    }

    #[tokio::test]
    async fn test_get_orderbook_splits_sides() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/perpetual/usdc/openapi/public/v1/order-book"))
            .and(query_param("symbol", "BTCPERP"))
            .respond_with(ok(json!([
                {"price": "29001", "size": "0.5", "side": "Sell"},
                {"price": "29000", "size": "1.2", "side": "Buy"},
                {"price": "28999.5", "size": "3", "side": "Buy"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let book = client(&server).get_orderbook("BTCPERP").await.expect("orderbook");
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.asks.len(), 1);
        assert_eq!(book.best_bid().unwrap().price.to_string(), "29000");
    }

    #[tokio::test]
    async fn test_get_orderbook_rejects_unknown_side() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ok(json!([{"price": "1", "size": "1", "side": "Hold"}])))
            .mount(&server)
            .await;

        let err = client(&server).get_orderbook("BTCPERP").await.unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_get_klines_sends_start_in_seconds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/perpetual/usdc/openapi/public/v1/mark-price-kline"))
            .and(query_param("symbol", "BTCPERP"))
            .and(query_param("period", "5"))
            .and(query_param("startTime", "1700000000"))
            .and(query_param("limit", "2"))
            .respond_with(ok(json!([
                {"symbol": "BTCPERP", "period": "5", "openTime": "1700000000",
                 "open": "1", "high": "2", "low": "0.5", "close": "1.5"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let klines = client(&server)
            .get_klines(KlineKind::Mark, "BTCPERP", "5", start, Some(2))
            .await
            .expect("klines");
        assert_eq!(klines[0].open_time, 1_700_000_000);
        assert_eq!(klines[0].close.to_string(), "1.5");
    }

    #[rstest]
    #[case::bad_period("BTCPERP", "7", Some(10), "period")]
    #[case::missing_symbol("", "5", None, "symbol")]
    #[case::zero_limit("BTCPERP", "5", Some(0), "limit")]
    #[case::limit_too_large("BTCPERP", "D", Some(201), "limit")]
    #[tokio::test]
    async fn test_get_klines_validation(
        #[case] symbol: &str,
        #[case] period: &str,
        #[case] limit: Option<u32>,
        #[case] field: &str,
    ) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ok(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let err = client(&server)
            .get_klines(KlineKind::Trade, symbol, period, start, limit)
            .await
            .unwrap_err();
        match err {
            ExchangeError::Validation { field: got, .. } => assert_eq!(got, field),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_open_interest_validates_period() {
        let client = BybitClient::new().unwrap();
        let err = client.get_open_interest("BTCPERP", "2h", None).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Validation { field: "period", .. }));
    }

    #[tokio::test]
    async fn test_get_latest_trades_unwraps_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/option/usdc/openapi/public/v1/query-trade-latest"))
            .and(query_param("category", "PERPETUAL"))
            .respond_with(ok(json!({
                "resultTotalSize": 1,
                "cursor": "",
                "dataList": [{"id": "t1", "symbol": "BTCPERP", "orderPrice": "29000",
                              "orderQty": "0.01", "side": "Buy", "time": "1700000000000"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let trades = client(&server)
            .get_latest_trades("PERPETUAL", None, None)
            .await
            .expect("trades");
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].time, 1_700_000_000_000);
    }

    #[tokio::test]
    async fn test_get_contracts_rejects_bad_direction() {
        let client = BybitClient::new().unwrap();
        let err = client
            .get_contracts(None, Some("sideways"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Validation { field: "direction", .. }));
    }

    #[tokio::test]
    async fn test_ret_code_surfaces_as_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/perpetual/usdc/openapi/public/v1/tick"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "retCode": 10001, "retMsg": "params error: symbol invalid", "result": null
            })))
            .mount(&server)
            .await;

        let err = client(&server).get_symbol_ticker("NOPE").await.unwrap_err();
        assert!(err.is_domain_error());
        assert!(err.to_string().contains("10001"));
    }
}
