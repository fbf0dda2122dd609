/*
[INPUT]:  Ethereum address, Stark key, onboarding parameters, wallet signer
[OUTPUT]: Nonces, onboarding results, user and account data
[POS]:    Apex adapter - onboarding (EIP-712 signed) and API-key endpoints
[UPDATE]: When the onboarding flow or private endpoints change
*/

use tracing::{debug, info};

use super::client::{ApexClient, endpoint};
use super::types::{AccountData, NonceData, OnboardingData, OnboardingRequest, UserData};
use crate::auth::{SignatureType, create_typed_signature, onboarding_digest};
use crate::http::{ExchangeError, RequestSpec, Result, require_non_empty};

const API_CATEGORY: &str = "CATEGORY_API";

impl ApexClient {
    /// GET /api/v1/check-user-exist?ethAddress={eth_address}
    pub async fn check_user_exists(&self, eth_address: &str) -> Result<bool> {
        let spec = RequestSpec::get(endpoint("/check-user-exist"))
            .query_non_empty("ethAddress", eth_address);
        self.public(spec).await
    }

    /// Request a one-time nonce for onboarding
    ///
    /// POST /api/v1/generate-nonce
    pub async fn generate_nonce(
        &self,
        eth_address: &str,
        stark_key: &str,
        chain_id: u64,
    ) -> Result<NonceData> {
        require_non_empty("ethAddress", eth_address)?;
        require_non_empty("starkKey", stark_key)?;
        if chain_id == 0 {
            return Err(ExchangeError::validation("chainId", "must not be zero"));
        }

        let spec = RequestSpec::post(endpoint("/generate-nonce"))
            .query("ethAddress", eth_address)
            .query("starkKey", stark_key)
            .query("chainId", chain_id)
            .query("category", API_CATEGORY);
        self.public(spec).await
    }

    /// Typed EIP-712 signature over the onboarding message for `nonce`
    pub async fn sign_onboarding(&self, nonce: &str, chain_id: u64) -> Result<String> {
        let wallet = self.wallet()?;
        let digest = onboarding_digest(chain_id, nonce);
        let raw = wallet.sign_hash(&digest).await?;
        create_typed_signature(&raw, SignatureType::NoPrepend)
    }

    /// Register the wallet and obtain API credentials
    ///
    /// Fetches a nonce, signs it with the configured wallet and posts the
    /// form to POST /api/v1/onboarding.
    pub async fn register(&self, request: &OnboardingRequest) -> Result<OnboardingData> {
        require_non_empty("starkKey", &request.stark_key)?;
        require_non_empty("starkKeyYCoordinate", &request.stark_key_y_coordinate)?;
        require_non_empty("ethereumAddress", &request.eth_address)?;
        let wallet_address = self.wallet()?.address().to_string();
        if !wallet_address.eq_ignore_ascii_case(&request.eth_address) {
            return Err(ExchangeError::validation(
                "ethereumAddress",
                format!("does not match wallet address {wallet_address}"),
            ));
        }

        let nonce = self
            .generate_nonce(&request.eth_address, &request.stark_key, request.chain_id)
            .await?;
        debug!(expires = nonce.nonce_expired, "apex onboarding nonce issued");
        let signature = self.sign_onboarding(&nonce.nonce, request.chain_id).await?;

        let mut form = vec![
            ("starkKey", request.stark_key.clone()),
            ("starkKeyYCoordinate", request.stark_key_y_coordinate.clone()),
            ("ethereumAddress", request.eth_address.clone()),
            ("category", API_CATEGORY.to_string()),
        ];
        if let Some(link) = request.referred_by_affiliate_link.as_ref().filter(|l| !l.is_empty()) {
            form.push(("referredByAffiliateLink", link.clone()));
        }
        if let Some(country) = request.country.as_ref().filter(|c| !c.is_empty()) {
            form.push(("country", country.clone()));
        }

        let spec = RequestSpec::post(endpoint("/onboarding"))
            .form_body(form)
            .header("APEX-SIGNATURE", signature)
            .header("APEX-ETHEREUM-ADDRESS", wallet_address);
        let onboarded: OnboardingData = self.public(spec).await?;
        info!(eth_address = %request.eth_address, "apex onboarding complete");
        Ok(onboarded)
    }

    /// GET /api/v1/user
    pub async fn get_user(&self) -> Result<UserData> {
        self.private(RequestSpec::get(endpoint("/user"))).await
    }

    /// GET /api/v1/account
    pub async fn get_account(&self) -> Result<AccountData> {
        self.private(RequestSpec::get(endpoint("/account"))).await
    }
}
