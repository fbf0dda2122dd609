/*
[INPUT]:  32-byte digests (EIP-712 or personal-sign hashes)
[OUTPUT]: Raw 65-byte secp256k1 signatures and the signing address
[POS]:    Auth layer - wallet integration abstraction
[UPDATE]: When adding new wallet backends (hardware, remote signers)
*/

use alloy_primitives::B256;
use async_trait::async_trait;

use crate::http::Result;

/// Signs prehashed digests with an Ethereum account
///
/// The trait is async to support hardware wallets and remote signers.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Checksummed `0x` address
    fn address(&self) -> &str;

    /// Sign `hash` without any prefix, returning `r || s || v`
    async fn sign_hash(&self, hash: &B256) -> Result<Vec<u8>>;
}

/// Mock wallet signer for testing
#[derive(Debug, Clone)]
pub struct MockWalletSigner {
    address: String,
    signature: Vec<u8>,
}

impl MockWalletSigner {
    /// Create a mock signer that always returns `signature`
    pub fn new(address: &str, signature: Vec<u8>) -> Self {
        Self {
            address: address.to_string(),
            signature,
        }
    }
}

#[async_trait]
impl WalletSigner for MockWalletSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_hash(&self, _hash: &B256) -> Result<Vec<u8>> {
        Ok(self.signature.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signer() {
        let signer = MockWalletSigner::new("0x1234567890abcdef", vec![7u8; 65]);
        assert_eq!(signer.address(), "0x1234567890abcdef");

        let signature = signer.sign_hash(&B256::ZERO).await.unwrap();
        assert_eq!(signature, vec![7u8; 65]);
    }
}
