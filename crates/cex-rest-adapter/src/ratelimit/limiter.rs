/*
[INPUT]:  EndpointLimit tag attached to every outbound request
[OUTPUT]: Admission (after an optional wait) from the matching token bucket
[POS]:    Rate limit layer - per-exchange bucket tables
[UPDATE]: When an exchange publishes new limits or endpoint classes
*/

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use super::TokenBucket;

const SPOT_REQUEST_RATE: u32 = 70;
const FUTURES_PUBLIC_REQUEST_RATE: u32 = 50;
const SPOT_PRIVATE_REQUEST_RATE: u32 = 20;

const FUTURES_DEFAULT_RATE: u32 = 100;
const FUTURES_ORDER_RATE: u32 = 100;
const FUTURES_ORDER_LIST_RATE: u32 = 600;
const FUTURES_EXECUTION_RATE: u32 = 120;
const FUTURES_POSITION_RATE: u32 = 75;
const FUTURES_POSITION_LIST_RATE: u32 = 120;
const FUTURES_FUNDING_RATE: u32 = 120;

/// Tokens consumed by bulk cancellation endpoints
const CANCEL_ALL_WEIGHT: u32 = 10;

/// Which limit class a call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointLimit {
    PublicSpot,
    PublicFutures,
    PrivateSpot,
    UsdcDefault,
    UsdcOrder,
    UsdcCancelAll,
    UsdcOrderList,
    UsdcPosition,
    UsdcPositionList,
    UsdcExecution,
    UsdcFunding,
}

/// Shared bucket a limit class draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketClass {
    SpotPublic,
    FuturesPublic,
    SpotPrivate,
    FuturesDefault,
    FuturesOrder,
    FuturesOrderList,
    FuturesExecution,
    FuturesPosition,
    FuturesPositionList,
    FuturesFunding,
}

impl EndpointLimit {
    pub fn bucket(self) -> BucketClass {
        match self {
            EndpointLimit::PublicSpot => BucketClass::SpotPublic,
            EndpointLimit::PublicFutures => BucketClass::FuturesPublic,
            EndpointLimit::PrivateSpot => BucketClass::SpotPrivate,
            EndpointLimit::UsdcDefault => BucketClass::FuturesDefault,
            EndpointLimit::UsdcOrder | EndpointLimit::UsdcCancelAll => BucketClass::FuturesOrder,
            EndpointLimit::UsdcOrderList => BucketClass::FuturesOrderList,
            EndpointLimit::UsdcPosition => BucketClass::FuturesPosition,
            EndpointLimit::UsdcPositionList => BucketClass::FuturesPositionList,
            EndpointLimit::UsdcExecution => BucketClass::FuturesExecution,
            EndpointLimit::UsdcFunding => BucketClass::FuturesFunding,
        }
    }

    pub fn weight(self) -> u32 {
        match self {
            EndpointLimit::UsdcCancelAll => CANCEL_ALL_WEIGHT,
            _ => 1,
        }
    }
}

/// Table of token buckets keyed by [`BucketClass`]
///
/// A limit whose class has no bucket falls back to the public spot bucket;
/// an empty table admits everything.
#[derive(Default)]
pub struct RateLimiter {
    buckets: HashMap<BucketClass, TokenBucket>,
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("buckets", &self.buckets.len())
            .finish()
    }
}

impl RateLimiter {
    /// A limiter that never waits
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_bucket(mut self, class: BucketClass, bucket: TokenBucket) -> Self {
        self.buckets.insert(class, bucket);
        self
    }

    /// Bybit spot and USDC perpetual limits
    pub fn bybit() -> Self {
        Self::unlimited()
            .with_bucket(
                BucketClass::SpotPublic,
                TokenBucket::per_second(SPOT_REQUEST_RATE),
            )
            .with_bucket(
                BucketClass::FuturesPublic,
                TokenBucket::per_second(FUTURES_PUBLIC_REQUEST_RATE),
            )
            .with_bucket(
                BucketClass::SpotPrivate,
                TokenBucket::per_second(SPOT_PRIVATE_REQUEST_RATE),
            )
            .with_bucket(
                BucketClass::FuturesDefault,
                TokenBucket::per_minute(FUTURES_DEFAULT_RATE),
            )
            .with_bucket(
                BucketClass::FuturesOrder,
                TokenBucket::per_minute(FUTURES_ORDER_RATE),
            )
            .with_bucket(
                BucketClass::FuturesOrderList,
                TokenBucket::per_minute(FUTURES_ORDER_LIST_RATE),
            )
            .with_bucket(
                BucketClass::FuturesExecution,
                TokenBucket::per_minute(FUTURES_EXECUTION_RATE),
            )
            .with_bucket(
                BucketClass::FuturesPosition,
                TokenBucket::per_minute(FUTURES_POSITION_RATE),
            )
            .with_bucket(
                BucketClass::FuturesPositionList,
                TokenBucket::per_minute(FUTURES_POSITION_LIST_RATE),
            )
            .with_bucket(
                BucketClass::FuturesFunding,
                TokenBucket::per_minute(FUTURES_FUNDING_RATE),
            )
    }

    /// KuCoin spot: shared spot constants
    pub fn kucoin() -> Self {
        Self::spot_only()
    }

    /// Apex: shared spot constants
    pub fn apex() -> Self {
        Self::spot_only()
    }

    fn spot_only() -> Self {
        Self::unlimited()
            .with_bucket(
                BucketClass::SpotPublic,
                TokenBucket::per_second(SPOT_REQUEST_RATE),
            )
            .with_bucket(
                BucketClass::SpotPrivate,
                TokenBucket::per_second(SPOT_PRIVATE_REQUEST_RATE),
            )
    }

    fn bucket_for(&self, limit: EndpointLimit) -> Option<&TokenBucket> {
        self.buckets
            .get(&limit.bucket())
            .or_else(|| self.buckets.get(&BucketClass::SpotPublic))
    }

    pub fn bucket(&self, class: BucketClass) -> Option<&TokenBucket> {
        self.buckets.get(&class)
    }

    /// Block until `limit` is admitted, consuming its weight
    pub async fn acquire(&self, limit: EndpointLimit) {
        match self.bucket_for(limit) {
            Some(bucket) => {
                trace!(?limit, weight = limit.weight(), "acquiring rate limit");
                bucket.acquire(limit.weight()).await;
            }
            None => trace!(?limit, "no bucket configured, admitting"),
        }
    }

    /// Admit `limit` only if it would not have to wait
    pub fn try_acquire(&self, limit: EndpointLimit) -> bool {
        self.bucket_for(limit)
            .map(|bucket| bucket.try_acquire(limit.weight()))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;
    use tokio::time::Instant;

    use super::*;

    #[rstest]
    #[case(EndpointLimit::UsdcCancelAll, BucketClass::FuturesOrder, 10)]
    #[case(EndpointLimit::UsdcOrder, BucketClass::FuturesOrder, 1)]
    #[case(EndpointLimit::UsdcOrderList, BucketClass::FuturesOrderList, 1)]
    #[case(EndpointLimit::PublicSpot, BucketClass::SpotPublic, 1)]
    fn test_limit_mapping(
        #[case] limit: EndpointLimit,
        #[case] class: BucketClass,
        #[case] weight: u32,
    ) {
        assert_eq!(limit.bucket(), class);
        assert_eq!(limit.weight(), weight);
    }

    #[test]
    fn test_bybit_table_constants() {
        let limiter = RateLimiter::bybit();
        let spot = limiter.bucket(BucketClass::SpotPublic).unwrap();
        assert_eq!(spot.capacity(), 70);
        assert_eq!(spot.interval(), Duration::from_secs(1));

        let position = limiter.bucket(BucketClass::FuturesPosition).unwrap();
        assert_eq!(position.capacity(), 75);
        assert_eq!(position.interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_unknown_class_falls_back_to_spot() {
        let limiter = RateLimiter::unlimited()
            .with_bucket(BucketClass::SpotPublic, TokenBucket::per_second(1));

        assert!(limiter.try_acquire(EndpointLimit::UsdcFunding));
        assert!(!limiter.try_acquire(EndpointLimit::PublicSpot));
    }

    #[test]
    fn test_unlimited_always_admits() {
        let limiter = RateLimiter::unlimited();
        for _ in 0..1_000 {
            assert!(limiter.try_acquire(EndpointLimit::UsdcCancelAll));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_n_plus_one_waits_for_refill() {
        let limiter = RateLimiter::unlimited()
            .with_bucket(BucketClass::FuturesPublic, TokenBucket::per_second(5));
        let start = Instant::now();

        for _ in 0..5 {
            limiter.acquire(EndpointLimit::PublicFutures).await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire(EndpointLimit::PublicFutures).await;
        assert!(start.elapsed() >= Duration::from_millis(199));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_drains_ten_tokens() {
        let limiter = RateLimiter::unlimited()
            .with_bucket(BucketClass::FuturesOrder, TokenBucket::per_minute(10));
        let start = Instant::now();

        limiter.acquire(EndpointLimit::UsdcCancelAll).await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        // bucket empty: one order token refills after six seconds
        limiter.acquire(EndpointLimit::UsdcOrder).await;
        assert!(start.elapsed() >= Duration::from_millis(5_999));
    }
}
