/*
[INPUT]:  Per-exchange limiter tables under a paused tokio clock
[OUTPUT]: Test results for token-bucket pacing, weights and cancellation
[POS]:    Integration tests - rate limiting
[UPDATE]: When bucket constants or reservation semantics change
*/

use std::sync::Arc;
use std::time::Duration;

use cex_rest_adapter::ratelimit::{BucketClass, TokenBucket};
use cex_rest_adapter::{EndpointLimit, RateLimiter};
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout};

#[tokio::test(start_paused = true)]
async fn test_private_spot_paces_after_burst() {
    let limiter = RateLimiter::kucoin();
    let start = Instant::now();

    for _ in 0..20 {
        limiter.acquire(EndpointLimit::PrivateSpot).await;
    }
    assert!(start.elapsed() < Duration::from_millis(1));

    for _ in 0..5 {
        limiter.acquire(EndpointLimit::PrivateSpot).await;
    }
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(249), "elapsed {elapsed:?}");
    assert!(elapsed <= Duration::from_millis(260), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_share_one_bucket() {
    let limiter = Arc::new(RateLimiter::apex());
    let start = Instant::now();

    let mut tasks = JoinSet::new();
    for _ in 0..30 {
        let limiter = Arc::clone(&limiter);
        tasks.spawn(async move {
            limiter.acquire(EndpointLimit::PrivateSpot).await;
            Instant::now()
        });
    }

    let mut finished = Vec::new();
    while let Some(done) = tasks.join_next().await {
        finished.push(done.expect("task panicked"));
    }

    // 20 immediately, the remaining 10 paced at 20/s
    let immediate = finished.iter().filter(|t| t.duration_since(start).is_zero()).count();
    assert_eq!(immediate, 20);
    let last = finished.iter().max().copied().unwrap_or(start);
    assert!(last.duration_since(start) >= Duration::from_millis(499));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_all_weighs_ten_order_tokens() {
    let limiter = RateLimiter::bybit();
    let start = Instant::now();

    for _ in 0..10 {
        limiter.acquire(EndpointLimit::UsdcCancelAll).await;
    }
    assert!(start.elapsed() < Duration::from_millis(1));
    assert!(!limiter.try_acquire(EndpointLimit::UsdcOrder));

    // ten tokens at 100/min is six seconds
    limiter.acquire(EndpointLimit::UsdcCancelAll).await;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(5_990), "elapsed {elapsed:?}");
    assert!(elapsed <= Duration::from_millis(6_100), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_buckets_are_independent() {
    let limiter = RateLimiter::bybit();
    for _ in 0..100 {
        assert!(limiter.try_acquire(EndpointLimit::UsdcOrder));
    }
    assert!(!limiter.try_acquire(EndpointLimit::UsdcOrder));
    assert!(limiter.try_acquire(EndpointLimit::UsdcOrderList));
    assert!(limiter.try_acquire(EndpointLimit::PublicFutures));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_wait_keeps_reservation() {
    let limiter = RateLimiter::unlimited()
        .with_bucket(BucketClass::SpotPublic, TokenBucket::per_second(1));
    limiter.acquire(EndpointLimit::PublicSpot).await;

    let waited = timeout(
        Duration::from_millis(100),
        limiter.acquire(EndpointLimit::PublicSpot),
    )
    .await;
    assert!(waited.is_err());

    // the abandoned reservation still owns the next token
    tokio::time::advance(Duration::from_millis(950)).await;
    assert!(!limiter.try_acquire(EndpointLimit::PublicSpot));
    tokio::time::advance(Duration::from_millis(1_000)).await;
    assert!(limiter.try_acquire(EndpointLimit::PublicSpot));
}
