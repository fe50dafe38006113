//! Read-through cache for API queries.
//!
//! Reads are keyed by a [`QueryKey`], kept for `stale_time`, and retried on
//! transient failures. Mutations name the keys they make stale; those keys are
//! invalidated before the mutation is reported complete, so the next read is
//! always fresh.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::app_error::ApiResult;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Ordered segments identifying a query, e.g. `clients/list/page=2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(root: impl Into<String>) -> Self {
        Self(vec![root.into()])
    }

    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Extra attempts after the first failure, for transient errors only.
    pub retry: u32,
    /// Delay before the first retry; doubles per attempt, capped at 30 s.
    pub retry_base_delay: Duration,
    /// How long a cached value is served without refetching.
    pub stale_time: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            retry: 3,
            retry_base_delay: Duration::from_secs(1),
            stale_time: Duration::from_secs(60),
        }
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

pub struct QueryCache {
    config: QueryConfig,
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Return the cached value for `key` if it is still fresh, otherwise run
    /// `fetcher` (retrying transient failures) and cache the result.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, mut fetcher: F) -> ApiResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        if let Some(value) = self.fresh::<T>(&key).await {
            debug!(key = %key, "query cache hit");
            return Ok(value);
        }

        let mut attempt = 0;
        let value = loop {
            match fetcher().await {
                Ok(value) => break value,
                Err(e) if e.is_transient() && attempt < self.config.retry => {
                    let delay = self.retry_delay(attempt);
                    attempt += 1;
                    warn!(key = %key, attempt, error = %e, ?delay, "query failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        };

        self.entries.lock().await.insert(
            key,
            CacheEntry {
                value: Arc::new(value.clone()),
                fetched_at: Instant::now(),
            },
        );
        Ok(value)
    }

    /// Run a mutation, then invalidate every key it makes stale before returning.
    /// Nothing is invalidated when the mutation fails.
    pub async fn mutate<T, Fut>(&self, mutation: Fut, invalidates: &[QueryKey]) -> ApiResult<T>
    where
        Fut: Future<Output = ApiResult<T>>,
    {
        let value = mutation.await?;
        for key in invalidates {
            self.invalidate(key).await;
        }
        Ok(value)
    }

    /// Drop every entry whose key starts with `prefix`. Returns how many were dropped.
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let dropped = before - entries.len();
        debug!(prefix = %prefix, dropped, "invalidated queries");
        dropped
    }

    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.entries.lock().await.contains_key(key)
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    async fn fresh<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.lock().await;
        let entry = entries.get(key)?;
        if entry.fetched_at.elapsed() >= self.config.stale_time {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(16);
        self.config
            .retry_base_delay
            .saturating_mul(factor)
            .min(MAX_RETRY_DELAY)
    }
}
