/*
[INPUT]:  Parsed subcommand, CLI configuration
[OUTPUT]: JSON value holding the exchange response
[POS]:    Command layer - builds a client and runs one query
[UPDATE]: When adding subcommands or exchange operations
*/

use std::sync::Arc;

use anyhow::{Context, Result};
use cex_rest_adapter::auth::BybitSigner;
use cex_rest_adapter::exchanges::apex::APEX_BASE_URL;
use cex_rest_adapter::exchanges::bybit::{BYBIT_BASE_URL, KlineKind, OrderQuery};
use cex_rest_adapter::exchanges::kucoin::{
    FillsQuery, KUCOIN_BASE_URL, OrderRequest, OrdersQuery,
};
use cex_rest_adapter::{ApexClient, BybitClient, EvmWalletSigner, KucoinClient, Side};
use chrono::{DateTime, Utc};
use clap::{Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::CliConfig;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// KuCoin spot endpoints
    #[command(subcommand)]
    Kucoin(KucoinCommand),
    /// Bybit USDC perpetual endpoints
    #[command(subcommand)]
    Bybit(BybitCommand),
    /// Apex v1 endpoints
    #[command(subcommand)]
    Apex(ApexCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum KucoinCommand {
    ServerTime,
    Symbols {
        #[arg(long)]
        market: Option<String>,
    },
    Ticker {
        symbol: String,
    },
    Stats {
        symbol: String,
    },
    Orderbook {
        symbol: String,
        #[arg(long, default_value_t = 20)]
        depth: u32,
    },
    Klines {
        symbol: String,
        #[arg(long, default_value = "1min")]
        period: String,
        /// Unix seconds
        #[arg(long)]
        start: Option<i64>,
        /// Unix seconds
        #[arg(long)]
        end: Option<i64>,
    },
    /// Signed
    Accounts {
        #[arg(long)]
        currency: Option<String>,
    },
    /// Signed
    Orders {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Signed
    Fills {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        order_id: Option<String>,
    },
    /// Signed; places a limit order
    PlaceLimit {
        symbol: String,
        #[arg(value_enum)]
        side: SideArg,
        price: Decimal,
        size: Decimal,
    },
    /// Signed
    Cancel {
        order_id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum BybitCommand {
    Orderbook {
        symbol: String,
    },
    Ticker {
        symbol: String,
    },
    Contracts {
        #[arg(long)]
        limit: Option<u32>,
    },
    Klines {
        symbol: String,
        #[arg(long, default_value = "60")]
        period: String,
        /// trade, mark, index or premium
        #[arg(long, default_value = "trade")]
        kind: KlineKind,
        /// Unix seconds
        #[arg(long)]
        start: i64,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Signed
    ActiveOrders {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long, default_value = "PERPETUAL")]
        category: String,
    },
    /// Signed
    CancelAll {
        symbol: String,
        #[arg(long, default_value = "Order")]
        order_filter: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ApexCommand {
    Time,
    Symbols,
    Depth {
        symbol: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    Ticker {
        symbol: String,
    },
    Klines {
        symbol: String,
        #[arg(long, default_value = "1")]
        interval: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    CheckUser {
        eth_address: String,
    },
    /// Signed
    User,
    /// Signed
    Account,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideArg {
    Buy,
    Sell,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Buy => Side::Buy,
            SideArg::Sell => Side::Sell,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn render(self, value: &Value) -> Result<String> {
        match self {
            OutputFormat::Json => serde_json::to_string_pretty(value).context("render json"),
            OutputFormat::Yaml => serde_yaml::to_string(value).context("render yaml"),
        }
    }
}

pub fn kucoin_client(config: &CliConfig) -> Result<KucoinClient> {
    let exchange = &config.kucoin;
    let client = KucoinClient::with_config_and_base_url(
        config.client_config(),
        exchange.base_url_or(KUCOIN_BASE_URL),
    )
    .context("build kucoin client")?;
    match exchange.credentials() {
        Some(credentials) => client
            .with_credentials(credentials)
            .context("kucoin credentials"),
        None => Ok(client),
    }
}

pub fn bybit_client(config: &CliConfig) -> Result<BybitClient> {
    let exchange = &config.bybit;
    let client = BybitClient::with_config_and_base_url(
        config.client_config(),
        exchange.base_url_or(BYBIT_BASE_URL),
    )
    .context("build bybit client")?;
    Ok(match exchange.credentials() {
        Some(credentials) => {
            let mut signer = BybitSigner::new(credentials);
            if let Some(recv_window) = exchange.recv_window_ms {
                signer = signer.with_recv_window(recv_window);
            }
            client.with_signer(signer)
        }
        None => client,
    })
}

pub fn apex_client(config: &CliConfig) -> Result<ApexClient> {
    let exchange = &config.apex;
    let mut client = ApexClient::with_config_and_base_url(
        config.client_config(),
        exchange.base_url_or(APEX_BASE_URL),
    )
    .context("build apex client")?;
    if let Some(credentials) = exchange.credentials() {
        client = client.with_credentials(credentials).context("apex credentials")?;
    }
    if let Some(key) = exchange.eth_private_key.as_deref().filter(|k| !k.is_empty()) {
        let wallet = EvmWalletSigner::new(key).context("apex wallet key")?;
        client = client.with_wallet(Arc::new(wallet));
    }
    Ok(client)
}

/// Run one subcommand and return its response as JSON
pub async fn run(command: Command, config: &CliConfig) -> Result<Value> {
    debug!(?command, "dispatching command");
    match command {
        Command::Kucoin(cmd) => run_kucoin(cmd, config).await,
        Command::Bybit(cmd) => run_bybit(cmd, config).await,
        Command::Apex(cmd) => run_apex(cmd, config).await,
    }
}

async fn run_kucoin(command: KucoinCommand, config: &CliConfig) -> Result<Value> {
    let client = kucoin_client(config)?;
    match command {
        KucoinCommand::ServerTime => to_json(client.get_server_time().await?),
        KucoinCommand::Symbols { market } => to_json(client.get_symbols(market.as_deref()).await?),
        KucoinCommand::Ticker { symbol } => to_json(client.get_ticker(&symbol).await?),
        KucoinCommand::Stats { symbol } => to_json(client.get_24hr_stats(&symbol).await?),
        KucoinCommand::Orderbook { symbol, depth } => {
            to_json(client.get_part_orderbook(&symbol, depth).await?)
        }
        KucoinCommand::Klines {
            symbol,
            period,
            start,
            end,
        } => {
            let klines = client
                .get_klines(&symbol, &period, seconds(start)?, seconds(end)?)
                .await?;
            to_json(klines)
        }
        KucoinCommand::Accounts { currency } => {
            to_json(client.get_accounts(currency.as_deref(), None).await?)
        }
        KucoinCommand::Orders { symbol, status } => {
            let query = OrdersQuery {
                symbol,
                status,
                ..OrdersQuery::default()
            };
            to_json(client.get_orders(&query).await?)
        }
        KucoinCommand::Fills { symbol, order_id } => {
            let query = FillsQuery {
                symbol,
                order_id,
                ..FillsQuery::default()
            };
            to_json(client.get_fills(&query).await?)
        }
        KucoinCommand::PlaceLimit {
            symbol,
            side,
            price,
            size,
        } => {
            let order = OrderRequest::limit(symbol, side.into(), price, size);
            let order_id = client.post_order(&order).await?;
            info!(%order_id, client_oid = %order.client_oid, "kucoin order placed");
            to_json(serde_json::json!({ "orderId": order_id, "clientOid": order.client_oid }))
        }
        KucoinCommand::Cancel { order_id } => to_json(client.cancel_order(&order_id).await?),
    }
}

async fn run_bybit(command: BybitCommand, config: &CliConfig) -> Result<Value> {
    let client = bybit_client(config)?;
    match command {
        BybitCommand::Orderbook { symbol } => to_json(client.get_orderbook(&symbol).await?),
        BybitCommand::Ticker { symbol } => to_json(client.get_symbol_ticker(&symbol).await?),
        BybitCommand::Contracts { limit } => to_json(client.get_contracts(None, None, limit).await?),
        BybitCommand::Klines {
            symbol,
            period,
            kind,
            start,
            limit,
        } => {
            let start = seconds(Some(start))?.context("start time is required")?;
            to_json(client.get_klines(kind, &symbol, &period, start, limit).await?)
        }
        BybitCommand::ActiveOrders { symbol, category } => {
            let mut query = OrderQuery::new(category);
            if let Some(symbol) = symbol {
                query = query.with_symbol(symbol);
            }
            to_json(client.get_active_orders(&query).await?)
        }
        BybitCommand::CancelAll {
            symbol,
            order_filter,
        } => {
            client.cancel_all_orders(&symbol, &order_filter).await?;
            info!(%symbol, "bybit orders cancelled");
            to_json(serde_json::json!({ "symbol": symbol, "cancelled": true }))
        }
    }
}

async fn run_apex(command: ApexCommand, config: &CliConfig) -> Result<Value> {
    let client = apex_client(config)?;
    match command {
        ApexCommand::Time => to_json(client.get_system_time().await?),
        ApexCommand::Symbols => to_json(client.get_all_config().await?),
        ApexCommand::Depth { symbol, limit } => {
            to_json(client.get_market_depth(&symbol, limit).await?)
        }
        ApexCommand::Ticker { symbol } => to_json(client.get_ticker(&symbol).await?),
        ApexCommand::Klines {
            symbol,
            interval,
            limit,
        } => {
            let klines = client
                .get_candlestick_chart(&interval, &symbol, None, None, limit)
                .await?;
            to_json(klines)
        }
        ApexCommand::CheckUser { eth_address } => {
            to_json(client.check_user_exists(&eth_address).await?)
        }
        ApexCommand::User => to_json(client.get_user().await?),
        ApexCommand::Account => to_json(client.get_account().await?),
    }
}

fn seconds(value: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|secs| {
            DateTime::<Utc>::from_timestamp(secs, 0)
                .with_context(|| format!("timestamp {secs} out of range"))
        })
        .transpose()
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("serialize response")
}
