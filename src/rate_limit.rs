//! Token bucket limiter shared by every upload worker.
//!
//! One token is added per `interval`, up to `burst` tokens. Each upload takes
//! one token before touching the network, so the request rate stays under
//! the service's limit however many workers are running.

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

pub struct TokenBucket {
    capacity: f64,
    tokens: f64,
    /// Tokens added per second.
    refill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// A full bucket holding `burst` tokens, refilled one per `interval`.
    pub fn new(interval: Duration, burst: u32) -> Self {
        let capacity = burst.max(1) as f64;
        Self {
            capacity,
            tokens: capacity,
            refill_rate: 1.0 / interval.as_secs_f64(),
            last_refill: Instant::now(),
        }
    }

    /// Take a token, or return how long until one is available.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let needed = 1.0 - self.tokens;
            Err(Duration::from_secs_f64(needed / self.refill_rate))
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }
}

/// Async front for a [`TokenBucket`]. A zero interval disables limiting.
pub struct RateLimiter {
    bucket: Option<Mutex<TokenBucket>>,
}

impl RateLimiter {
    pub fn new(interval: Duration, burst: u32) -> Self {
        if interval.is_zero() {
            return Self::unlimited();
        }
        Self {
            bucket: Some(Mutex::new(TokenBucket::new(interval, burst))),
        }
    }

    pub fn unlimited() -> Self {
        Self { bucket: None }
    }

    /// Wait until a token is available and take it.
    pub async fn acquire(&self) {
        let Some(bucket) = &self.bucket else {
            return;
        };
        loop {
            let wait = match bucket.lock().await.try_acquire() {
                Ok(()) => return,
                Err(wait) => wait,
            };
            tracing::trace!(wait_ms = wait.as_millis() as u64, "Rate limited");
            tokio::time::sleep(wait).await;
        }
    }
}
