/*
[INPUT]:  Symbol identifiers and query parameters
[OUTPUT]: Apex market data (config, depth, trades, klines, tickers, funding)
[POS]:    Apex adapter - public market data endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::client::{ApexClient, endpoint};
use super::types::{
    AllConfig, DepthData, FundingHistory, FundingRate, KlineData, SystemTime, TickerData, TradeData,
};
use crate::http::{RequestSpec, Result, require_non_empty, require_one_of};
use crate::types::Orderbook;

/// Kline intervals accepted by `/klines`
pub const VALID_INTERVALS: &[&str] = &[
    "1", "5", "15", "30", "60", "120", "240", "360", "720", "D", "M", "W",
];

impl ApexClient {
    /// Server time in milliseconds
    ///
    /// GET /api/v1/time
    pub async fn get_system_time(&self) -> Result<SystemTime> {
        self.public(RequestSpec::get(endpoint("/time"))).await
    }

    /// Currency and perpetual contract configuration
    ///
    /// GET /api/v1/symbols
    pub async fn get_all_config(&self) -> Result<AllConfig> {
        self.public(RequestSpec::get(endpoint("/symbols"))).await
    }

    /// All active bids and asks for one symbol
    ///
    /// GET /api/v1/depth?symbol={symbol}&limit={limit}
    pub async fn get_market_depth(&self, symbol: &str, limit: Option<u32>) -> Result<Orderbook> {
        require_non_empty("symbol", symbol)?;
        let spec = RequestSpec::get(endpoint("/depth"))
            .query("symbol", symbol)
            .query_opt("limit", limit);
        let depth: DepthData = self.public(spec).await?;

        let symbol = if depth.symbol.is_empty() {
            symbol.to_string()
        } else {
            depth.symbol
        };
        Orderbook::from_pairs(symbol, &depth.bids, &depth.asks, None)
    }

    /// GET /api/v1/trades?symbol={symbol}&limit={limit}&from={from}
    pub async fn get_latest_trades(
        &self,
        symbol: &str,
        limit: Option<u32>,
        from: Option<i64>,
    ) -> Result<Vec<TradeData>> {
        require_non_empty("symbol", symbol)?;
        let spec = RequestSpec::get(endpoint("/trades"))
            .query("symbol", symbol)
            .query_opt("limit", limit)
            .query_opt("from", from);
        self.public(spec).await
    }

    /// Candlesticks for `symbol`; an empty `interval` uses the exchange default
    ///
    /// GET /api/v1/klines
    pub async fn get_candlestick_chart(
        &self,
        interval: &str,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> Result<Vec<KlineData>> {
        if !interval.is_empty() {
            require_one_of("interval", interval, VALID_INTERVALS)?;
        }
        require_non_empty("symbol", symbol)?;

        let spec = RequestSpec::get(endpoint("/klines"))
            .query_non_empty("interval", interval)
            .query("symbol", symbol)
            .query_opt("start", start.map(|t| t.timestamp_millis()))
            .query_opt("end", end.map(|t| t.timestamp_millis()))
            .query_opt("limit", limit);

        // payload is keyed by symbol
        let mut by_symbol: HashMap<String, Vec<KlineData>> = self.public(spec).await?;
        Ok(by_symbol.remove(symbol).unwrap_or_default())
    }

    /// GET /api/v1/ticker?symbol={symbol}
    pub async fn get_ticker(&self, symbol: &str) -> Result<Vec<TickerData>> {
        require_non_empty("symbol", symbol)?;
        self.public(RequestSpec::get(endpoint("/ticker")).query("symbol", symbol))
            .await
    }

    /// GET /api/v1/history-funding
    pub async fn get_funding_rate_history(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<FundingRate>> {
        require_non_empty("symbol", symbol)?;
        let spec = RequestSpec::get(endpoint("/history-funding"))
            .query("symbol", symbol)
            .query_opt("beginTimeInclusive", start.map(|t| t.timestamp_millis()))
            .query_opt("endTimeExclusive", end.map(|t| t.timestamp_millis()))
            .query_opt("limit", limit)
            .query_opt("page", page);
        let history: FundingHistory = self.public(spec).await?;
        Ok(history.history_funds)
    }
}
