/*
[INPUT]:  Symbols, markets, candle types and time ranges
[OUTPUT]: KuCoin spot market data
[POS]:    KuCoin adapter - public market data endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use chrono::{DateTime, TimeZone, Utc};

use super::client::KucoinClient;
use super::types::{
    AllTickers, Currency, DepthData, Kline, ServiceStatus, SymbolInfo, Ticker, TickerStats, Trade,
};
use crate::http::{ExchangeError, RequestSpec, Result, require_non_empty, require_one_of};
use crate::types::Orderbook;

/// Candle types accepted by `/market/candles`
pub const VALID_PERIODS: &[&str] = &[
    "1min", "3min", "5min", "15min", "30min", "1hour", "2hour", "4hour", "6hour", "8hour",
    "12hour", "1day", "1week",
];

impl KucoinClient {
    /// Trading pairs, optionally restricted to one market (e.g. `USDS`)
    ///
    /// GET /api/v1/symbols
    pub async fn get_symbols(&self, market: Option<&str>) -> Result<Vec<SymbolInfo>> {
        let spec = RequestSpec::get("/api/v1/symbols")
            .query_opt("market", market.filter(|m| !m.is_empty()));
        self.public(spec).await
    }

    /// GET /api/v1/market/orderbook/level1?symbol={symbol}
    pub async fn get_ticker(&self, symbol: &str) -> Result<Ticker> {
        require_non_empty("symbol", symbol)?;
        self.public(RequestSpec::get("/api/v1/market/orderbook/level1").query("symbol", symbol))
            .await
    }

    /// GET /api/v1/market/allTickers
    pub async fn get_all_tickers(&self) -> Result<AllTickers> {
        self.public(RequestSpec::get("/api/v1/market/allTickers"))
            .await
    }

    /// GET /api/v1/market/stats?symbol={symbol}
    pub async fn get_24hr_stats(&self, symbol: &str) -> Result<TickerStats> {
        require_non_empty("symbol", symbol)?;
        self.public(RequestSpec::get("/api/v1/market/stats").query("symbol", symbol))
            .await
    }

    /// GET /api/v1/markets
    pub async fn get_market_list(&self) -> Result<Vec<String>> {
        self.public(RequestSpec::get("/api/v1/markets")).await
    }

    /// Top 20 or top 100 levels per side
    pub async fn get_part_orderbook(&self, symbol: &str, depth: u32) -> Result<Orderbook> {
        require_non_empty("symbol", symbol)?;
        let path = match depth {
            20 => "/api/v1/market/orderbook/level2_20",
            100 => "/api/v1/market/orderbook/level2_100",
            other => {
                return Err(ExchangeError::validation(
                    "depth",
                    format!("must be 20 or 100, got {other}"),
                ));
            }
        };
        let depth: DepthData = self.public(RequestSpec::get(path).query("symbol", symbol)).await?;
        Orderbook::from_pairs(symbol, &depth.bids, &depth.asks, Some(depth.time))
    }

    /// GET /api/v1/market/histories?symbol={symbol}
    pub async fn get_trade_history(&self, symbol: &str) -> Result<Vec<Trade>> {
        require_non_empty("symbol", symbol)?;
        self.public(RequestSpec::get("/api/v1/market/histories").query("symbol", symbol))
            .await
    }

    /// Candles for `symbol`; the time bounds go out as Unix seconds
    ///
    /// GET /api/v1/market/candles
    pub async fn get_klines(
        &self,
        symbol: &str,
        period: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Kline>> {
        require_non_empty("symbol", symbol)?;
        require_non_empty("type", period)?;
        require_one_of("type", period, VALID_PERIODS)?;

        let spec = RequestSpec::get("/api/v1/market/candles")
            .query("symbol", symbol)
            .query("type", period)
            .query_opt("startAt", start.map(|t| t.timestamp()))
            .query_opt("endAt", end.map(|t| t.timestamp()));
        let rows: Vec<[String; 7]> = self.public(spec).await?;
        rows.iter().map(Kline::from_row).collect()
    }

    /// GET /api/v1/currencies
    pub async fn get_currencies(&self) -> Result<Vec<Currency>> {
        self.public(RequestSpec::get("/api/v1/currencies")).await
    }

    /// GET /api/v1/timestamp
    pub async fn get_server_time(&self) -> Result<DateTime<Utc>> {
        let millis: i64 = self.public(RequestSpec::get("/api/v1/timestamp")).await?;
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| ExchangeError::InvalidResponse(format!("server time out of range: {millis}")))
    }

    /// GET /api/v1/status
    pub async fn get_service_status(&self) -> Result<ServiceStatus> {
        self.public(RequestSpec::get("/api/v1/status")).await
    }
}
