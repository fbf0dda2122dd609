/*
[INPUT]:  Endpoint limit classes and exchange rate constants
[OUTPUT]: Blocking admission for outbound requests
[POS]:    Rate limit layer - token buckets shared by every client
[UPDATE]: When limit classes or bucket semantics change
*/

pub mod bucket;
pub mod limiter;

pub use bucket::TokenBucket;
pub use limiter::{BucketClass, EndpointLimit, RateLimiter};
