//! Cache entries and the clock used to age them

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::Question;

/// Source of "now" for cache aging
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_nanos: AtomicU64::new(0),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

/// One category's fetched questions; replaced wholesale, never patched
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fetched_at: Instant,
    /// Exact category spelling the data was fetched for
    pub category: String,
    pub data: Arc<Vec<Question>>,
}

impl CacheEntry {
    pub fn new(fetched_at: Instant, category: &str, data: Arc<Vec<Question>>) -> Self {
        Self {
            fetched_at,
            category: category.to_string(),
            data,
        }
    }

    /// Age relative to `now`
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.fetched_at)
    }

    /// Whether the entry can serve a request for `category` at `now`
    pub fn serves(&self, category: &str, now: Instant, ttl: Duration) -> bool {
        self.category == category && self.age(now) < ttl
    }
}
