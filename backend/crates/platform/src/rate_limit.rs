//! Rate Limiting Infrastructure
//!
//! Fixed-window counters keyed by an arbitrary string (client IP, user id).
//! Windows are aligned to `floor(now / window) * window`, so every key rolls
//! over at the same instant.

use std::time::Duration;

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use dashmap::DashMap;

/// Current Unix time in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn from_millis(max_requests: u32, window_ms: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_millis(window_ms),
        }
    }

    pub fn window_ms(&self) -> i64 {
        (self.window.as_millis() as i64).max(1)
    }

    /// Start of the window containing `now_ms`
    pub fn window_start(&self, now_ms: i64) -> i64 {
        let window_ms = self.window_ms();
        now_ms.div_euclid(window_ms) * window_ms
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Seconds until the current window closes, at least 1
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let remaining_ms = (self.reset_at_ms - now_ms).max(0) as u64;
        remaining_ms.div_ceil(1000).max(1)
    }

    /// `RateLimit-Limit`, `RateLimit-Remaining` and `RateLimit-Reset`, plus
    /// `Retry-After` when the request was rejected
    pub fn apply_headers(&self, headers: &mut HeaderMap, now_ms: i64) {
        let reset = self.retry_after_secs(now_ms);
        headers.insert(
            HeaderName::from_static("ratelimit-limit"),
            HeaderValue::from(self.limit),
        );
        headers.insert(
            HeaderName::from_static("ratelimit-remaining"),
            HeaderValue::from(self.remaining),
        );
        headers.insert(
            HeaderName::from_static("ratelimit-reset"),
            HeaderValue::from(reset),
        );
        if !self.allowed {
            headers.insert(header::RETRY_AFTER, HeaderValue::from(reset));
        }
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one request against `key` and report whether it is allowed
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    window_start_ms: i64,
    window_ms: i64,
    count: u32,
}

/// Process-local store backed by a [`DashMap`]
///
/// Counters of closed windows linger until [`purge_expired`] runs.
///
/// [`purge_expired`]: InMemoryRateLimitStore::purge_expired
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    counters: DashMap<String, WindowCounter>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a request at an explicit instant
    pub fn check_at(&self, key: &str, config: &RateLimitConfig, now_ms: i64) -> RateLimitResult {
        let window_start_ms = config.window_start(now_ms);
        let window_ms = config.window_ms();

        let mut entry = self
            .counters
            .entry(key.to_string())
            .or_insert(WindowCounter {
                window_start_ms,
                window_ms,
                count: 0,
            });

        if entry.window_start_ms != window_start_ms || entry.window_ms != window_ms {
            *entry = WindowCounter {
                window_start_ms,
                window_ms,
                count: 0,
            };
        }
        entry.count = entry.count.saturating_add(1);
        let count = entry.count;
        drop(entry);

        let allowed = count <= config.max_requests;
        if !allowed {
            tracing::warn!(key = %key, count, max = config.max_requests, "Rate limit exceeded");
        }

        RateLimitResult {
            allowed,
            limit: config.max_requests,
            remaining: config.max_requests.saturating_sub(count),
            reset_at_ms: window_start_ms + window_ms,
        }
    }

    /// Drop counters whose window closed before `now_ms`, returning how many went
    pub fn purge_expired(&self, now_ms: i64) -> usize {
        let before = self.counters.len();
        self.counters
            .retain(|_, c| c.window_start_ms + c.window_ms > now_ms);
        let purged = before.saturating_sub(self.counters.len());
        if purged > 0 {
            tracing::debug!(purged, "Expired rate limit windows purged");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.check_at(key, config, now_ms()))
    }
}
