/*
[INPUT]:  APEX_ETH_PRIVATE_KEY, APEX_STARK_KEY, APEX_STARK_KEY_Y environment variables
[OUTPUT]: Apex API credentials issued for the wallet
[POS]:    Examples - EIP-712 signed onboarding
[UPDATE]: When the onboarding flow changes
*/

use std::sync::Arc;

use cex_rest_adapter::exchanges::apex::OnboardingRequest;
use cex_rest_adapter::*;

/// Example: Register a wallet with Apex and print the issued API key
///
/// The Stark key pair is derived elsewhere and passed in.
#[tokio::main]
async fn main() {
    println!("=== Apex Onboarding Example ===\n");

    let (Ok(private_key), Ok(stark_key), Ok(stark_key_y)) = (
        std::env::var("APEX_ETH_PRIVATE_KEY"),
        std::env::var("APEX_STARK_KEY"),
        std::env::var("APEX_STARK_KEY_Y"),
    ) else {
        eprintln!("Set APEX_ETH_PRIVATE_KEY, APEX_STARK_KEY and APEX_STARK_KEY_Y");
        return;
    };

    let wallet = match EvmWalletSigner::new(&private_key) {
        Ok(w) => Arc::new(w),
        Err(e) => {
            eprintln!("Invalid private key: {}", e);
            return;
        }
    };
    println!("✓ Wallet address: {}", wallet.address());

    let client = match ApexClient::new() {
        Ok(c) => c.with_wallet(wallet.clone()),
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };

    let request = OnboardingRequest {
        stark_key,
        stark_key_y_coordinate: stark_key_y,
        eth_address: wallet.address().to_string(),
        chain_id: 1,
        referred_by_affiliate_link: None,
        country: None,
    };

    match client.register(&request).await {
        Ok(onboarded) => println!("✓ Onboarded, API key issued: {}", onboarded.api_key.is_some()),
        Err(e) => println!("✗ Error: {}", e),
    }
}
