/*
[INPUT]:  API credentials, wallet keys, request content
[OUTPUT]: Signed request headers and typed wallet signatures
[POS]:    Auth layer - HMAC request signing and EIP-712 wallet signing
[UPDATE]: When auth flow or signature methods change
*/

pub mod credentials;
pub mod eip712;
pub mod evm_wallet;
pub mod signer;
pub mod typed_signature;
pub mod wallet;

pub use credentials::Credentials;
pub use eip712::{Eip712Domain, apex_domain, onboarding_digest};
pub use evm_wallet::EvmWalletSigner;
pub use signer::{ApexSigner, BybitSigner, KucoinSigner, RequestAuthenticator};
pub use typed_signature::{SignatureType, create_typed_signature, typed_signature_from_hex};
pub use wallet::{MockWalletSigner, WalletSigner};
