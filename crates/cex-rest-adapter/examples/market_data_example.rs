/*
[INPUT]:  Symbol identifiers (e.g., "BTC-USDT", "BTCPERP")
[OUTPUT]: Market data (ticker, depth, candles) from KuCoin and Bybit
[POS]:    Examples - public market data queries
[UPDATE]: When adding new market data endpoints
*/

use cex_rest_adapter::*;

/// Example: Query market data (no authentication required)
#[tokio::main]
async fn main() {
    println!("=== Exchange Market Data Example ===\n");

    let kucoin = match KucoinClient::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create KuCoin client: {}", e);
            return;
        }
    };
    let bybit = match BybitClient::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create Bybit client: {}", e);
            return;
        }
    };

    println!("Querying KuCoin ticker for BTC-USDT...");
    match kucoin.get_ticker("BTC-USDT").await {
        Ok(ticker) => println!("✓ Ticker: {:?}", ticker),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying KuCoin top-20 depth for BTC-USDT...");
    match kucoin.get_part_orderbook("BTC-USDT", 20).await {
        Ok(book) => println!(
            "✓ Best bid {:?}, best ask {:?}",
            book.best_bid(),
            book.best_ask()
        ),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying Bybit USDC orderbook for BTCPERP...");
    match bybit.get_orderbook("BTCPERP").await {
        Ok(book) => println!("✓ {} bids, {} asks", book.bids.len(), book.asks.len()),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ Market data example complete");
}
