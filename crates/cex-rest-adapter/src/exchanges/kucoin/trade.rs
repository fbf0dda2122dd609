/*
[INPUT]:  Orders, order ids and account filters with API credentials
[OUTPUT]: Full orderbook, order acknowledgements, order details, balances
[POS]:    KuCoin adapter - signed spot trading and account endpoints
[UPDATE]: When adding private endpoints or changing order parameters
*/

use tracing::info;

use super::client::KucoinClient;
use super::types::{
    AccountInfo, CancelledByClientOid, CancelledOrders, DepthData, Fill, FillsQuery, OrderAck,
    OrderDetail, OrderRequest, OrdersQuery, Paged,
};
use crate::http::{RequestSpec, Result, require_non_empty, require_path_id};
use crate::types::Orderbook;

/// Longest order id or client order id KuCoin issues or accepts
const MAX_ID_LEN: usize = 40;

impl KucoinClient {
    /// Full-depth orderbook; requires credentials
    ///
    /// GET /api/v3/market/orderbook/level2?symbol={symbol}
    pub async fn get_full_orderbook(&self, symbol: &str) -> Result<Orderbook> {
        require_non_empty("symbol", symbol)?;
        let spec = RequestSpec::get("/api/v3/market/orderbook/level2").query("symbol", symbol);
        let depth: DepthData = self.private(spec).await?;
        Orderbook::from_pairs(symbol, &depth.bids, &depth.asks, Some(depth.time))
    }

    /// Place a spot order; returns the exchange order id
    ///
    /// POST /api/v1/orders
    pub async fn post_order(&self, order: &OrderRequest) -> Result<String> {
        let body = order.to_body()?;
        let spec = RequestSpec::post("/api/v1/orders").json_body(&body)?;
        let ack: OrderAck = self.private(spec).await?;
        info!(symbol = %order.symbol, client_oid = %order.client_oid, order_id = %ack.order_id, "kucoin order placed");
        Ok(ack.order_id)
    }

    /// DELETE /api/v1/orders/{order_id}
    pub async fn cancel_order(&self, order_id: &str) -> Result<Vec<String>> {
        require_path_id("orderId", order_id, MAX_ID_LEN)?;
        let cancelled: CancelledOrders = self
            .private(RequestSpec::delete(format!("/api/v1/orders/{order_id}")))
            .await?;
        Ok(cancelled.cancelled_order_ids)
    }

    /// DELETE /api/v1/order/client-order/{client_oid}
    pub async fn cancel_order_by_client_oid(&self, client_oid: &str) -> Result<CancelledByClientOid> {
        require_path_id("clientOid", client_oid, MAX_ID_LEN)?;
        self.private(RequestSpec::delete(format!("/api/v1/order/client-order/{client_oid}")))
            .await
    }

    /// Cancel every open order, optionally for one symbol or trade type
    ///
    /// DELETE /api/v1/orders
    pub async fn cancel_all_orders(
        &self,
        symbol: Option<&str>,
        trade_type: Option<&str>,
    ) -> Result<Vec<String>> {
        let spec = RequestSpec::delete("/api/v1/orders")
            .query_opt("symbol", symbol.filter(|s| !s.is_empty()))
            .query_opt("tradeType", trade_type.filter(|t| !t.is_empty()));
        let cancelled: CancelledOrders = self.private(spec).await?;
        info!(count = cancelled.cancelled_order_ids.len(), "kucoin orders cancelled");
        Ok(cancelled.cancelled_order_ids)
    }

    /// GET /api/v1/orders
    pub async fn get_orders(&self, query: &OrdersQuery) -> Result<Paged<OrderDetail>> {
        let spec = RequestSpec::get("/api/v1/orders")
            .query_opt("status", query.status.as_deref())
            .query_opt("symbol", query.symbol.as_deref())
            .query_opt("side", query.side.map(|s| s.as_lowercase()))
            .query_opt("type", query.order_type.map(|t| t.as_lowercase()))
            .query_opt("tradeType", query.trade_type.as_deref())
            .query_opt("startAt", query.start_at)
            .query_opt("endAt", query.end_at);
        self.private(spec).await
    }

    /// GET /api/v1/orders/{order_id}
    pub async fn get_order(&self, order_id: &str) -> Result<OrderDetail> {
        require_path_id("orderId", order_id, MAX_ID_LEN)?;
        self.private(RequestSpec::get(format!("/api/v1/orders/{order_id}")))
            .await
    }

    /// GET /api/v1/order/client-order/{client_oid}
    pub async fn get_order_by_client_oid(&self, client_oid: &str) -> Result<OrderDetail> {
        require_path_id("clientOid", client_oid, MAX_ID_LEN)?;
        self.private(RequestSpec::get(format!("/api/v1/order/client-order/{client_oid}")))
            .await
    }

    /// GET /api/v1/fills
    pub async fn get_fills(&self, query: &FillsQuery) -> Result<Paged<Fill>> {
        if let Some(order_id) = query.order_id.as_deref() {
            require_path_id("orderId", order_id, MAX_ID_LEN)?;
        }
        let spec = RequestSpec::get("/api/v1/fills")
            .query_opt("orderId", query.order_id.as_deref())
            .query_opt("symbol", query.symbol.as_deref())
            .query_opt("side", query.side.map(|s| s.as_lowercase()))
            .query_opt("type", query.order_type.map(|t| t.as_lowercase()))
            .query_opt("tradeType", query.trade_type.as_deref())
            .query_opt("startAt", query.start_at)
            .query_opt("endAt", query.end_at);
        self.private(spec).await
    }

    /// Fills of the last 24 hours, at most 1000
    ///
    /// GET /api/v1/limit/fills
    pub async fn get_recent_fills(&self) -> Result<Vec<Fill>> {
        self.private(RequestSpec::get("/api/v1/limit/fills")).await
    }

    /// Balances, optionally filtered by currency and account type
    ///
    /// GET /api/v1/accounts
    pub async fn get_accounts(
        &self,
        currency: Option<&str>,
        account_type: Option<&str>,
    ) -> Result<Vec<AccountInfo>> {
        let spec = RequestSpec::get("/api/v1/accounts")
            .query_opt("currency", currency.filter(|c| !c.is_empty()))
            .query_opt("type", account_type.filter(|t| !t.is_empty()));
        self.private(spec).await
    }
}
