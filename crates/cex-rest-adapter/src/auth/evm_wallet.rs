/*
[INPUT]:  EVM private key (hex string) injected from configuration
[OUTPUT]: Digest signatures and checksummed wallet address
[POS]:    Auth layer - local secp256k1 wallet implementation
[UPDATE]: When signing logic or EVM address formatting changes
*/

use std::fmt;
use std::str::FromStr;

use alloy_primitives::B256;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::auth::WalletSigner;
use crate::http::{ExchangeError, Result};

/// Local EVM wallet
pub struct EvmWalletSigner {
    signer: PrivateKeySigner,
    address: String,
}

impl fmt::Debug for EvmWalletSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmWalletSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl EvmWalletSigner {
    /// Create a signer from a hex-encoded private key
    ///
    /// Supports both "0x"-prefixed and non-prefixed hex strings.
    pub fn new(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer = PrivateKeySigner::from_str(private_key_hex)
            .map_err(|e| ExchangeError::Config(format!("Invalid EVM private key: {e}")))?;

        let address = signer.address().to_checksum(None);

        Ok(Self { signer, address })
    }
}

#[async_trait]
impl WalletSigner for EvmWalletSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_hash(&self, hash: &B256) -> Result<Vec<u8>> {
        let signature = self
            .signer
            .sign_hash(hash)
            .await
            .map_err(|e| ExchangeError::Signing(format!("Failed to sign digest: {e}")))?;

        // r || s || v with v as 27/28
        Ok(signature.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::eip712::onboarding_digest;
    use crate::auth::{SignatureType, create_typed_signature};
    use alloy_primitives::Signature;

    // well-known development key, never funded
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_address_with_and_without_prefix() {
        assert_eq!(EvmWalletSigner::new(DEV_KEY).unwrap().address(), DEV_ADDRESS);
        assert_eq!(
            EvmWalletSigner::new(&DEV_KEY[2..]).unwrap().address(),
            DEV_ADDRESS
        );
    }

    #[test]
    fn test_invalid_key_is_config_error() {
        assert!(matches!(
            EvmWalletSigner::new("0x1234"),
            Err(ExchangeError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_hash_recovers_to_address() {
        let signer = EvmWalletSigner::new(DEV_KEY).unwrap();
        let digest = onboarding_digest(1, "1234567890");

        let raw = signer.sign_hash(&digest).await.unwrap();
        assert_eq!(raw.len(), 65);
        assert!(raw[64] == 27 || raw[64] == 28);

        let signature = Signature::try_from(raw.as_slice()).unwrap();
        let recovered = signature.recover_address_from_prehash(&digest).unwrap();
        assert_eq!(recovered.to_checksum(None), DEV_ADDRESS);

        let typed = create_typed_signature(&raw, SignatureType::NoPrepend).unwrap();
        assert_eq!(typed.len(), 134);
        assert!(typed.ends_with("00"));
    }

    #[tokio::test]
    async fn test_signing_is_deterministic() {
        let signer = EvmWalletSigner::new(DEV_KEY).unwrap();
        let digest = onboarding_digest(1, "nonce-a");
        let first = signer.sign_hash(&digest).await.unwrap();
        let second = signer.sign_hash(&digest).await.unwrap();
        assert_eq!(first, second);
    }
}
