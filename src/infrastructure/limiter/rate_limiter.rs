use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// A token bucket which allows fractional tokens for precise refill
#[derive(Debug)]
struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_per_sec: f64) -> Self {
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Small epsilon to avoid fp surprises
    fn try_consume(&mut self) -> bool {
        self.refill();
        if self.tokens + 1e-12 >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Whole seconds until the next token is available.
    fn retry_after(&self) -> u64 {
        let missing = (1.0 - self.tokens).max(0.0);
        ((missing / self.refill_per_sec).ceil() as u64).max(1)
    }

    fn is_full(&self) -> bool {
        self.tokens >= self.capacity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

/// Per-client token buckets, e.g. keyed by IP for the contact form.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<String, Arc<Mutex<TokenBucket>>>>,
    capacity: f64,
    refill_per_sec: f64,
}

impl RateLimiterStore {
    /// `limit` requests per `period`, refilled continuously.
    pub fn new(limit: u32, period: Duration) -> Self {
        let capacity = f64::from(limit.max(1));
        Self {
            map: Arc::new(DashMap::new()),
            capacity,
            refill_per_sec: capacity / period.as_secs_f64().max(1.0),
        }
    }

    pub fn per_hour(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(3600))
    }

    /// Drops buckets that have refilled completely; they carry no state worth keeping.
    pub fn spawn_eviction(&self) {
        let map = self.map.clone();
        tokio::spawn(async move {
            loop {
                sleep(EVICTION_INTERVAL).await;
                map.retain(|_, bucket| {
                    let mut bucket = bucket.lock();
                    bucket.refill();
                    !bucket.is_full()
                });
            }
        });
    }

    fn get_bucket(&self, key: &str) -> Arc<Mutex<TokenBucket>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TokenBucket::new(self.capacity, self.refill_per_sec))))
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        let bucket = self.get_bucket(key);
        let mut bucket = bucket.lock();
        if bucket.try_consume() {
            RateDecision::Allowed
        } else {
            RateDecision::Limited {
                retry_after_secs: bucket.retry_after(),
            }
        }
    }
}
