// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed window rate limiter for contact submissions.
//!
//! Each client key gets a counter and a window start. The first hit after
//! the window has elapsed starts a new window with a count of one. Once the
//! count reaches the limit, further hits are rejected until the window
//! expires.
//!
//! Counters live behind [`RateLimitStore`] so a deployment running several
//! instances can swap in a shared store. [`MemoryStore`] is scoped to one
//! process and forgets everything on restart.

use crate::config::RateLimitConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Counter state for one client key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    /// Submissions seen in the current window
    pub count: u32,
    /// Epoch milliseconds when the window opened
    pub window_start_ms: i64,
}

impl RateLimitEntry {
    fn expired(&self, now_ms: i64, window_ms: i64) -> bool {
        now_ms.saturating_sub(self.window_start_ms) > window_ms
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining submissions in the current window
        remaining: u32,
    },
    /// Request is rate limited
    Limited {
        /// Time until the window resets, at least one second
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Keyed storage for rate limit counters.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<RateLimitEntry>;

    async fn set(&self, key: &str, entry: RateLimitEntry);

    /// Replace the entry for `key` with `apply(previous)` and return the
    /// previous entry.
    ///
    /// The default is a plain read followed by a write, so two concurrent
    /// hits on the same key may both observe the same previous count.
    /// Stores that can do better should override it.
    async fn update(
        &self,
        key: &str,
        apply: &(dyn Fn(Option<RateLimitEntry>) -> RateLimitEntry + Send + Sync),
    ) -> Option<RateLimitEntry> {
        let previous = self.get(key).await;
        self.set(key, apply(previous)).await;
        previous
    }

    /// Drop every entry whose window has expired. Returns how many were removed.
    async fn sweep(&self, now_ms: i64, window_ms: i64) -> usize;
}

/// Process-local counter map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, RateLimitEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked client keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RateLimitStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.read().await.get(key).copied()
    }

    async fn set(&self, key: &str, entry: RateLimitEntry) {
        self.entries.write().await.insert(key.to_string(), entry);
    }

    async fn update(
        &self,
        key: &str,
        apply: &(dyn Fn(Option<RateLimitEntry>) -> RateLimitEntry + Send + Sync),
    ) -> Option<RateLimitEntry> {
        // Read and write under one guard so same-key hits cannot under-count.
        let mut entries = self.entries.write().await;
        let previous = entries.get(key).copied();
        entries.insert(key.to_string(), apply(previous));
        previous
    }

    async fn sweep(&self, now_ms: i64, window_ms: i64) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.expired(now_ms, window_ms));
        before - entries.len()
    }
}

/// Per-client submission limiter.
pub struct RateLimiter {
    config: RateLimitConfig,
    store: Box<dyn RateLimitStore>,
}

impl RateLimiter {
    /// Create a limiter backed by an in-memory store.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_store(config, Box::new(MemoryStore::new()))
    }

    pub fn with_store(config: RateLimitConfig, store: Box<dyn RateLimitStore>) -> Self {
        Self { config, store }
    }

    /// Count a submission from `key` at `now_ms` and decide whether it may
    /// proceed.
    pub async fn check(&self, key: &str, now_ms: i64) -> RateLimitResult {
        let max = self.config.max_requests;
        let window_ms = self.config.window_ms();

        let previous = self
            .store
            .update(key, &|previous: Option<RateLimitEntry>| {
                advance(previous, now_ms, window_ms, max)
            })
            .await;

        match previous {
            Some(entry) if !entry.expired(now_ms, window_ms) && entry.count >= max => {
                let elapsed = now_ms.saturating_sub(entry.window_start_ms);
                let retry_after = retry_after_secs(window_ms - elapsed);
                debug!(client = %key, retry_after_secs = retry_after, "Client rate limit exceeded");
                RateLimitResult::Limited {
                    retry_after: Duration::from_secs(retry_after),
                }
            }
            Some(entry) if !entry.expired(now_ms, window_ms) => RateLimitResult::Allowed {
                remaining: max.saturating_sub(entry.count + 1),
            },
            _ => RateLimitResult::Allowed {
                remaining: max.saturating_sub(1),
            },
        }
    }

    /// Clean up expired entries (should be called periodically).
    pub async fn cleanup(&self, now_ms: i64) -> usize {
        let removed = self.store.sweep(now_ms, self.config.window_ms()).await;
        if removed > 0 {
            debug!(removed, "Swept expired rate limit entries");
        }
        removed
    }
}

/// Next stored state for a key given its previous state.
fn advance(previous: Option<RateLimitEntry>, now_ms: i64, window_ms: i64, max: u32) -> RateLimitEntry {
    match previous {
        Some(entry) if !entry.expired(now_ms, window_ms) => {
            if entry.count >= max {
                entry
            } else {
                RateLimitEntry {
                    count: entry.count + 1,
                    ..entry
                }
            }
        }
        _ => RateLimitEntry {
            count: 1,
            window_start_ms: now_ms,
        },
    }
}

/// Whole seconds, rounded up, never below one.
fn retry_after_secs(remaining_ms: i64) -> u64 {
    let secs = (remaining_ms.max(0) as u64).div_ceil(1000);
    secs.max(1)
}
