/*
[INPUT]:  Token requests from dispatching callers
[OUTPUT]: Wait durations; callers are admitted once their reservation matures
[POS]:    Rate limit layer - single token bucket
[UPDATE]: When changing refill or reservation semantics
*/

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

#[derive(Debug)]
struct BucketState {
    /// May go negative: outstanding reservations not yet refilled
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket refilling continuously at `capacity / interval`
///
/// Reservations never fail; a caller that overdraws the bucket is told how
/// long to wait until its tokens have been refilled.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    interval: Duration,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a full bucket. `capacity` of zero is treated as one.
    pub fn new(capacity: u32, interval: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            interval,
            state: Mutex::new(BucketState {
                tokens: f64::from(capacity),
                last_refill: Instant::now(),
            }),
        }
    }

    pub fn per_second(capacity: u32) -> Self {
        Self::new(capacity, Duration::from_secs(1))
    }

    pub fn per_minute(capacity: u32) -> Self {
        Self::new(capacity, Duration::from_secs(60))
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn tokens_per_sec(&self) -> f64 {
        f64::from(self.capacity) / self.interval.as_secs_f64()
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        let elapsed = now.saturating_duration_since(state.last_refill);
        let refilled = state.tokens + elapsed.as_secs_f64() * self.tokens_per_sec();
        state.tokens = refilled.min(f64::from(self.capacity));
        state.last_refill = now;
    }

    /// Take `tokens` at `now` and return how long the caller must wait
    pub fn reserve_at(&self, tokens: u32, now: Instant) -> Duration {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.refill(&mut state, now);
        state.tokens -= f64::from(tokens);
        if state.tokens >= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(-state.tokens / self.tokens_per_sec())
                .unwrap_or(Duration::MAX)
        }
    }

    /// Take `tokens` only if they are available at `now`
    pub fn try_acquire_at(&self, tokens: u32, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.refill(&mut state, now);
        if state.tokens >= f64::from(tokens) {
            state.tokens -= f64::from(tokens);
            true
        } else {
            false
        }
    }

    pub fn try_acquire(&self, tokens: u32) -> bool {
        self.try_acquire_at(tokens, Instant::now())
    }

    /// Reserve `tokens` and sleep until they are ours
    ///
    /// Dropping the returned future abandons the wait; the reservation
    /// itself is not refunded.
    pub async fn acquire(&self, tokens: u32) {
        let delay = self.reserve_at(tokens, Instant::now());
        if !delay.is_zero() {
            debug!(
                tokens,
                capacity = self.capacity,
                wait_ms = whole_millis(delay),
                "rate limiter delaying request"
            );
            sleep(delay).await;
        }
    }

    /// Tokens available at `now`; negative while reservations are outstanding
    pub fn available_at(&self, now: Instant) -> f64 {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.refill(&mut state, now);
        state.tokens
    }
}

/// Milliseconds in `delay`, saturating at `u64::MAX`
fn whole_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}
