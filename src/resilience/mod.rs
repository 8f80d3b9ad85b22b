//! Client-side pacing.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`rate_limiter`] | Window-refill token bucket shared by all calls of one client |
//!
//! ```rust
//! use truelist::resilience::rate_limiter::{RateLimiter, RateLimiterConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> truelist::Result<()> {
//! let limiter = RateLimiter::new(RateLimiterConfig::new().with_capacity(10));
//! limiter.acquire(&CancellationToken::new()).await?;
//! // Proceed with exactly one request...
//! # Ok(())
//! # }
//! ```

pub mod rate_limiter;
