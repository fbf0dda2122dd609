/*
[INPUT]:  Onboarding nonce and chain id
[OUTPUT]: EIP-712 signing hash of the Apex onboarding message
[POS]:    Auth layer - structured-data hashing for Apex onboarding
[UPDATE]: When Apex changes its onboarding domain or message fields
*/

use alloy_primitives::B256;
use alloy_sol_types::{SolStruct, eip712_domain};

pub use alloy_sol_types::Eip712Domain;

pub const DOMAIN_NAME: &str = "ApeX";
pub const DOMAIN_VERSION: &str = "1.0";
pub const ONBOARDING_ACTION: &str = "ApeX Onboarding";
pub const ONLY_SIGN_ON: &str = "https://pro.apex.exchange";

alloy_sol_types::sol! {
    /// Onboarding message; the type name is part of the signed type string
    #[derive(Debug)]
    struct ApeX {
        string action;
        string onlySignOn;
        string nonce;
    }
}

/// `EIP712Domain(string name,string version,uint256 chainId)` for Apex
pub fn apex_domain(chain_id: u64) -> Eip712Domain {
    eip712_domain! {
        name: DOMAIN_NAME,
        version: DOMAIN_VERSION,
        chain_id: chain_id,
    }
}

fn onboarding_message(nonce: &str) -> ApeX {
    ApeX {
        action: ONBOARDING_ACTION.to_string(),
        onlySignOn: ONLY_SIGN_ON.to_string(),
        nonce: nonce.to_string(),
    }
}

/// Struct hash of the onboarding message for `nonce`
pub fn onboarding_struct_hash(nonce: &str) -> B256 {
    onboarding_message(nonce).eip712_hash_struct()
}

/// Digest the wallet signs to onboard with `nonce`
pub fn onboarding_digest(chain_id: u64, nonce: &str) -> B256 {
    onboarding_message(nonce).eip712_signing_hash(&apex_domain(chain_id))
}
