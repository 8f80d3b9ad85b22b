use crate::transport::TransportError;
use crate::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct RateLimiterSnapshot {
    pub capacity: u32,
    pub tokens: u32,
    /// Estimated wait until the next window opens (ms), if currently empty.
    pub estimated_wait_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Admissions per window.
    pub capacity: u32,
    /// Window length; the bucket is refilled wholesale when it rolls over.
    pub window: Duration,
    /// Lower bound on a single wait so an almost-expired window doesn't spin.
    pub min_wait: Duration,
}

impl RateLimiterConfig {
    /// Create a new config with default values (10 per second)
    pub fn new() -> Self {
        Self {
            capacity: 10,
            window: Duration::from_secs(1),
            min_wait: Duration::from_millis(10),
        }
    }

    /// Set the number of admissions per window (at least 1)
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Set the window length (never shorter than `min_wait`)
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window.max(self.min_wait);
        self
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct State {
    tokens: u32,
    window_start: Instant,
}

/// Window-refill token bucket.
///
/// Up to `capacity` callers are admitted per window; the bucket is topped up in
/// one step when the window rolls over rather than trickled. The lock covers
/// only check-reset-decrement, never the wait.
#[derive(Debug)]
pub struct RateLimiter {
    cfg: RateLimiterConfig,
    state: Mutex<State>,
}

impl RateLimiter {
    pub fn new(cfg: RateLimiterConfig) -> Self {
        let state = Mutex::new(State {
            tokens: cfg.capacity,
            window_start: Instant::now(),
        });
        Self { cfg, state }
    }

    fn roll_window_locked(cfg: &RateLimiterConfig, st: &mut State, now: Instant) {
        if now.duration_since(st.window_start) >= cfg.window {
            st.tokens = cfg.capacity;
            st.window_start = now;
        }
    }

    /// Take a token, or return how long to wait before trying again.
    async fn take_or_wait(&self) -> Option<Duration> {
        let cfg = &self.cfg;
        let mut st = self.state.lock().await;
        let now = Instant::now();
        Self::roll_window_locked(cfg, &mut st, now);

        if st.tokens > 0 {
            st.tokens -= 1;
            return None;
        }

        let until_next = (st.window_start + cfg.window).saturating_duration_since(now);
        Some(until_next.max(cfg.min_wait))
    }

    /// Acquire one token, sleeping across window boundaries as needed.
    ///
    /// Returns a cancellation error as soon as `cancel` fires, including while asleep.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<()> {
        loop {
            if cancel.is_cancelled() {
                return Err(TransportError::Cancelled.into());
            }

            let Some(wait) = self.take_or_wait().await else {
                return Ok(());
            };

            tracing::trace!(wait_ms = wait.as_millis() as u64, "rate limiter bucket empty");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TransportError::Cancelled.into()),
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    /// Try to acquire a token without waiting, returns true if successful
    pub async fn try_acquire(&self) -> bool {
        self.take_or_wait().await.is_none()
    }

    pub async fn snapshot(&self) -> RateLimiterSnapshot {
        let cfg = &self.cfg;
        let mut st = self.state.lock().await;
        let now = Instant::now();
        Self::roll_window_locked(cfg, &mut st, now);

        let estimated_wait_ms = (st.tokens == 0).then(|| {
            (st.window_start + cfg.window)
                .saturating_duration_since(now)
                .as_millis() as u64
        });

        RateLimiterSnapshot {
            capacity: cfg.capacity,
            tokens: st.tokens,
            estimated_wait_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_rate_limiter_config_defaults() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.window, Duration::from_secs(1));
        assert_eq!(config.min_wait, Duration::from_millis(10));
    }

    #[test]
    fn test_rate_limiter_config_capacity_floor() {
        let config = RateLimiterConfig::new().with_capacity(0);
        assert_eq!(config.capacity, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_zero_window_still_limits() {
        let config = RateLimiterConfig::new()
            .with_capacity(2)
            .with_window(Duration::ZERO);
        assert_eq!(config.window, Duration::from_millis(10));

        let limiter = RateLimiter::new(config);
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_initial_burst() {
        let limiter = RateLimiter::new(RateLimiterConfig::new());
        let cancel = CancellationToken::new();
        let start = Instant::now();

        for _ in 0..10 {
            limiter.acquire(&cancel).await.unwrap();
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        let snapshot = limiter.snapshot().await;
        assert_eq!(snapshot.tokens, 0);
        assert_eq!(snapshot.estimated_wait_ms, Some(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_overflow_waits_for_next_window() {
        let limiter = RateLimiter::new(RateLimiterConfig::new());
        let cancel = CancellationToken::new();
        let start = Instant::now();

        for _ in 0..11 {
            limiter.acquire(&cancel).await.unwrap();
        }
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() < Duration::from_millis(1100));

        // The refilled window has given out one of its ten.
        assert_eq!(limiter.snapshot().await.tokens, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_try_acquire() {
        let limiter = RateLimiter::new(RateLimiterConfig::new().with_capacity(3));

        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(limiter.try_acquire().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_no_partial_refill() {
        let limiter = RateLimiter::new(RateLimiterConfig::new().with_capacity(2));
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(!limiter.try_acquire().await);
        assert_eq!(limiter.snapshot().await.estimated_wait_ms, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_concurrent_admissions_bounded_per_window() {
        let limiter = Arc::new(RateLimiter::new(RateLimiterConfig::new()));
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let limiter = limiter.clone();
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                limiter.acquire(&cancel).await.unwrap();
                Instant::now()
            }));
        }

        let mut admitted = Vec::new();
        for handle in handles {
            admitted.push(handle.await.unwrap());
        }
        admitted.sort();

        assert_eq!(admitted.len(), 25);
        // Any 11 consecutive admissions must span at least one full window.
        for pair in admitted.windows(11) {
            assert!(pair[10].duration_since(pair[0]) >= Duration::from_secs(1));
        }
        let first_window = admitted
            .iter()
            .filter(|t| t.duration_since(start) < Duration::from_secs(1))
            .count();
        assert_eq!(first_window, 10);
        assert!(admitted[24].duration_since(start) < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_cancelled_while_waiting() {
        let limiter = RateLimiter::new(RateLimiterConfig::new().with_capacity(1));
        let cancel = CancellationToken::new();
        limiter.acquire(&cancel).await.unwrap();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let err = limiter.acquire(&cancel).await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_rate_limiter_cancelled_before_acquire() {
        let limiter = RateLimiter::new(RateLimiterConfig::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(limiter.acquire(&cancel).await.unwrap_err().is_cancelled());
        // No token was consumed.
        assert_eq!(limiter.snapshot().await.tokens, 10);
    }
}
