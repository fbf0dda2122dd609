/*
[INPUT]:  Order requests and queries with API credentials
[OUTPUT]: Order acknowledgements, cancellations, order and execution pages
[POS]:    Bybit adapter - signed USDC perpetual trading endpoints
[UPDATE]: When adding private endpoints or changing order parameters
*/

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::client::{BybitClient, OPTION_PRIVATE, PERPETUAL_PRIVATE, check_limit};
use super::types::{ModifyOrderRequest, OrderAck, OrderQuery, Page, PlaceOrderRequest, UsdcExecution, UsdcOrder};
use crate::http::{ExchangeError, RequestSpec, Result, require_non_empty, require_positive};
use crate::ratelimit::EndpointLimit;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OrderIdResult {
    order_id: String,
}

impl BybitClient {
    /// POST .../place-order
    pub async fn place_order(&self, order: &PlaceOrderRequest) -> Result<OrderAck> {
        require_non_empty("symbol", &order.symbol)?;
        require_non_empty("orderFilter", &order.order_filter)?;
        require_positive("orderQty", order.order_qty)?;

        let spec = RequestSpec::post(format!("{PERPETUAL_PRIVATE}/place-order")).json_body(order)?;
        let ack: OrderAck = self.private(spec, EndpointLimit::UsdcOrder).await?;
        info!(symbol = %order.symbol, order_id = %ack.order_id, "bybit order placed");
        Ok(ack)
    }

    /// Amend price, quantity or triggers of a live order; returns its id
    ///
    /// POST .../replace-order
    pub async fn modify_order(&self, request: &ModifyOrderRequest) -> Result<String> {
        require_non_empty("symbol", &request.symbol)?;
        require_non_empty("orderFilter", &request.order_filter)?;
        if let Some(qty) = request.order_qty {
            require_positive("orderQty", qty)?;
        }

        let spec =
            RequestSpec::post(format!("{PERPETUAL_PRIVATE}/replace-order")).json_body(request)?;
        let result: OrderIdResult = self.private(spec, EndpointLimit::UsdcOrder).await?;
        Ok(result.order_id)
    }

    /// Cancel by exchange id or client link id; returns the cancelled id
    ///
    /// POST .../cancel-order
    pub async fn cancel_order(
        &self,
        symbol: &str,
        order_filter: &str,
        order_id: Option<&str>,
        order_link_id: Option<&str>,
    ) -> Result<String> {
        require_non_empty("symbol", symbol)?;
        require_non_empty("orderFilter", order_filter)?;

        let mut body = json!({"symbol": symbol, "orderFilter": order_filter});
        if let Some(id) = order_id.filter(|id| !id.is_empty()) {
            body["orderId"] = json!(id);
        }
        if let Some(id) = order_link_id.filter(|id| !id.is_empty()) {
            body["orderLinkId"] = json!(id);
        }

        let spec = RequestSpec::post(format!("{PERPETUAL_PRIVATE}/cancel-order")).json_body(&body)?;
        let result: OrderIdResult = self.private(spec, EndpointLimit::UsdcOrder).await?;
        Ok(result.order_id)
    }

    /// Cancel every active order on `symbol`; costs ten order-class tokens
    ///
    /// POST .../cancel-all
    pub async fn cancel_all_orders(&self, symbol: &str, order_filter: &str) -> Result<()> {
        require_non_empty("symbol", symbol)?;
        require_non_empty("orderFilter", order_filter)?;

        let body = json!({"symbol": symbol, "orderFilter": order_filter});
        let spec = RequestSpec::post(format!("{PERPETUAL_PRIVATE}/cancel-all")).json_body(&body)?;
        self.private_unit(spec, EndpointLimit::UsdcCancelAll).await?;
        info!(symbol, "bybit orders cancelled");
        Ok(())
    }

    /// POST /option/usdc/openapi/private/v1/query-active-orders
    pub async fn get_active_orders(&self, query: &OrderQuery) -> Result<Page<UsdcOrder>> {
        require_non_empty("category", &query.category)?;
        let spec = RequestSpec::post(format!("{OPTION_PRIVATE}/query-active-orders"))
            .json_body(query)?;
        self.private(spec, EndpointLimit::UsdcOrderList).await
    }

    /// Orders from the last 30 days
    ///
    /// POST /option/usdc/openapi/private/v1/query-order-history
    pub async fn get_order_history(&self, query: &OrderQuery) -> Result<Page<UsdcOrder>> {
        require_non_empty("category", &query.category)?;
        let spec = RequestSpec::post(format!("{OPTION_PRIVATE}/query-order-history"))
            .json_body(query)?;
        self.private(spec, EndpointLimit::UsdcOrderList).await
    }

    /// Executions since `start` (at most 50 per page)
    ///
    /// POST /option/usdc/openapi/private/v1/execution-list
    pub async fn get_trade_history(
        &self,
        query: &OrderQuery,
        start: DateTime<Utc>,
    ) -> Result<Page<UsdcExecution>> {
        require_non_empty("category", &query.category)?;
        if start.timestamp() <= 0 {
            return Err(ExchangeError::validation("startTime", "must be after the epoch"));
        }
        check_limit(query.limit, 50)?;

        let mut body = serde_json::to_value(query)?;
        body["startTime"] = json!(start.timestamp().to_string());
        let spec = RequestSpec::post(format!("{OPTION_PRIVATE}/execution-list")).json_body(&body)?;
        self.private(spec, EndpointLimit::UsdcExecution).await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::auth::Credentials;
    use crate::exchanges::bybit::{BybitClient, ModifyOrderRequest, OrderQuery, PlaceOrderRequest};
    use crate::http::{ClientConfig, ExchangeError};
    use crate::types::{OrderType, Side};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn signed_client(server: &MockServer) -> BybitClient {
        BybitClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
            .with_credentials(Credentials::new("test_api_key", "test_secret"))
    }

    fn ok(result: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"retCode": 0, "retMsg": "OK", "result": result}))
    }

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    #[tokio::test]
    async fn test_place_order_signed_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/perpetual/usdc/openapi/private/v1/place-order"))
            .and(header("X-BAPI-API-KEY", "test_api_key"))
            .and(header("X-BAPI-SIGN-TYPE", "2"))
            .and(header("X-BAPI-RECV-WINDOW", "5000"))
            .and(header_exists("X-BAPI-SIGN"))
            .and(header_exists("X-BAPI-TIMESTAMP"))
            .and(body_json(json!({
                "symbol": "BTCPERP",
                "orderType": "Limit",
                "orderFilter": "Order",
                "side": "Buy",
                "orderQty": "0.01",
                "orderPrice": "29000",
                "reduceOnly": false,
                "closeOnTrigger": false,
                "mmp": false
            })))
            .respond_with(ok(json!({"orderId": "o-1", "orderLinkId": "", "symbol": "BTCPERP",
                                    "orderPrice": "29000", "orderQty": "0.01",
                                    "orderType": "Limit", "side": "Buy"})))
            .expect(1)
            .mount(&server)
            .await;

        let order = PlaceOrderRequest::new("BTCPERP", OrderType::Limit, Side::Buy, dec("0.01"))
            .with_price(dec("29000"));
        let ack = signed_client(&server).place_order(&order).await.expect("place");
        assert_eq!(ack.order_id, "o-1");
    }

    #[tokio::test]
    async fn test_place_order_validation_precedes_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ok(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let client = signed_client(&server);
        let zero = PlaceOrderRequest::new("BTCPERP", OrderType::Market, Side::Sell, Decimal::ZERO);
        let err = client.place_order(&zero).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Validation { field: "orderQty", .. }));

        let mut no_filter = PlaceOrderRequest::new("BTCPERP", OrderType::Market, Side::Sell, dec("1"));
        no_filter.order_filter.clear();
        let err = client.place_order(&no_filter).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Validation { field: "orderFilter", .. }));
    }

    #[tokio::test]
    async fn test_private_call_without_credentials() {
        let client = BybitClient::new().unwrap();
        let err = client.cancel_all_orders("BTCPERP", "Order").await.unwrap_err();
        assert!(matches!(err, ExchangeError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_modify_and_cancel_return_order_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/perpetual/usdc/openapi/private/v1/replace-order"))
            .and(body_json(json!({"symbol": "BTCPERP", "orderFilter": "Order",
                                  "orderId": "o-1", "orderPrice": "29100"})))
            .respond_with(ok(json!({"orderId": "o-1", "orderLinkId": ""})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/perpetual/usdc/openapi/private/v1/cancel-order"))
            .and(body_json(json!({"symbol": "BTCPERP", "orderFilter": "Order", "orderLinkId": "mine"})))
            .respond_with(ok(json!({"orderId": "o-2"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = signed_client(&server);
        let modify = ModifyOrderRequest {
            symbol: "BTCPERP".into(),
            order_filter: "Order".into(),
            order_id: Some("o-1".into()),
            order_price: Some(dec("29100")),
            ..ModifyOrderRequest::default()
        };
        assert_eq!(client.modify_order(&modify).await.unwrap(), "o-1");

        let cancelled = client
            .cancel_order("BTCPERP", "Order", None, Some("mine"))
            .await
            .unwrap();
        assert_eq!(cancelled, "o-2");
    }

    #[tokio::test]
    async fn test_cancel_all_accepts_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/perpetual/usdc/openapi/private/v1/cancel-all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"retCode": 0, "retMsg": "OK"})))
            .expect(1)
            .mount(&server)
            .await;

        tokio_test::assert_ok!(signed_client(&server).cancel_all_orders("BTCPERP", "Order").await);
    }

    #[tokio::test]
    async fn test_get_active_orders_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/option/usdc/openapi/private/v1/query-active-orders"))
            .and(body_json(json!({"category": "PERPETUAL", "symbol": "BTCPERP"})))
            .respond_with(ok(json!({
                "cursor": "next-1",
                "resultTotalSize": 1,
                "dataList": [{"orderId": "o-1", "symbol": "BTCPERP", "side": "Buy",
                              "price": "29000", "qty": "0.01", "orderStatus": "New",
                              "createdAt": "1700000000000"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = OrderQuery::new("PERPETUAL").with_symbol("BTCPERP");
        let page = signed_client(&server).get_active_orders(&query).await.unwrap();
        assert_eq!(page.cursor, "next-1");
        assert_eq!(page.data_list[0].created_at, 1_700_000_000_000);
    }

    #[tokio::test]
    async fn test_get_trade_history_start_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/option/usdc/openapi/private/v1/execution-list"))
            .and(body_json(json!({"category": "PERPETUAL", "limit": 20, "startTime": "1700000000"})))
            .respond_with(ok(json!({"cursor": "", "resultTotalSize": 0, "dataList": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = signed_client(&server);
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut query = OrderQuery::new("PERPETUAL");
        query.limit = Some(20);
        let page = client.get_trade_history(&query, start).await.unwrap();
        assert!(page.data_list.is_empty());

        query.limit = Some(51);
        let err = client.get_trade_history(&query, start).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Validation { field: "limit", .. }));
    }
}
