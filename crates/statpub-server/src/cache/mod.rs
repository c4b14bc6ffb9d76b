//! In-process response cache
//!
//! Query handlers wrap their database work in [`ContentCache::get_or_insert_with`]:
//! the normalized query is serialized, hashed into a key under the handler's
//! namespace, and the serialized response is kept until the earlier of its TTL
//! and the next [`ExpirySchedule`] boundary.
//!
//! Values are stored as JSON so one cache can hold every response type.
//! Capacity is bounded; the least recently used entry is evicted first.
//!
//! # Example
//!
//! ```rust,ignore
//! let response = cache
//!     .get_or_insert_with("publications", &resolved, || fetch(&pool, &resolved))
//!     .await?;
//! ```

mod schedule;

pub use schedule::ExpirySchedule;

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;

/// Upper bound on entry lifetime regardless of configuration (one year)
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

pub const THEMES_NAMESPACE: &str = "themes";
pub const PUBLICATIONS_NAMESPACE: &str = "publications";
pub const DATA_SET_FILES_NAMESPACE: &str = "data-set-files";

/// Every namespace a handler caches under
pub const NAMESPACES: [&str; 3] = [THEMES_NAMESPACE, PUBLICATIONS_NAMESPACE, DATA_SET_FILES_NAMESPACE];

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Unknown cache expiry schedule: {0}. Must be 'none', 'half_hourly' or 'hourly'")]
    UnknownSchedule(String),
}

struct CacheEntry {
    value: serde_json::Value,
    expires_at: DateTime<Utc>,
}

struct CacheInner {
    entries: Mutex<LruCache<String, CacheEntry>>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Shared handle to the response cache
///
/// Cloning is cheap; all clones see the same entries.
#[derive(Clone)]
pub struct ContentCache {
    inner: Arc<CacheInner>,
}

/// Snapshot of cache occupancy and effectiveness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub capacity: usize,
    pub total_entries: usize,
    pub expired_entries: usize,
    pub valid_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub schedule: ExpirySchedule,
}

impl ContentCache {
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(CacheInner {
                entries: Mutex::new(LruCache::new(capacity)),
                config,
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
            }),
        }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self::new(CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.config.enabled
    }

    /// Build the key for `params` under `namespace`
    ///
    /// Keys look like `"publications:<sha256 hex>"` so that a namespace can
    /// be cleared by prefix.
    pub fn key<K: Serialize + ?Sized>(namespace: &str, params: &K) -> Result<String, serde_json::Error> {
        let serialized = serde_json::to_string(params)?;
        let mut hasher = Sha256::new();
        hasher.update(namespace.as_bytes());
        hasher.update(b"\0");
        hasher.update(serialized.as_bytes());
        Ok(format!("{}:{:x}", namespace, hasher.finalize()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        if !self.is_enabled() {
            return None;
        }

        let value = {
            let mut entries = self.inner.entries.lock().ok()?;
            let lookup = entries
                .get(key)
                .map(|entry| (entry.expires_at > now).then(|| entry.value.clone()));
            match lookup {
                Some(Some(value)) => Some(value),
                Some(None) => {
                    entries.pop(key);
                    debug!(key = %key, "Cache entry expired");
                    None
                },
                None => None,
            }
        };

        let Some(value) = value else {
            self.inner.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        match serde_json::from_value(value) {
            Ok(decoded) => {
                self.inner.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache hit");
                Some(decoded)
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Cached value has unexpected shape, evicting");
                self.remove(key);
                self.inner.misses.fetch_add(1, Ordering::Relaxed);
                None
            },
        }
    }

    pub fn insert<T: Serialize + ?Sized>(&self, key: String, value: &T) {
        self.insert_at(key, value, Utc::now());
    }

    fn insert_at<T: Serialize + ?Sized>(&self, key: String, value: &T, now: DateTime<Utc>) {
        if !self.is_enabled() {
            return;
        }

        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize value for cache");
                return;
            },
        };

        let ttl = Duration::seconds(self.inner.config.ttl_secs.min(MAX_TTL_SECS) as i64);
        let expires_at = self.inner.config.schedule.expiry(now, ttl);

        if let Ok(mut entries) = self.inner.entries.lock() {
            if let Some((evicted, _)) = entries.push(key.clone(), CacheEntry { value, expires_at }) {
                if evicted != key {
                    debug!(key = %evicted, "Evicted least recently used cache entry");
                }
            }
            debug!(key = %key, expires_at = %expires_at, "Cached response");
        }
    }

    /// Cache-aside lookup
    ///
    /// Returns the cached value for `params` when present. Otherwise runs
    /// `loader`, stores its `Ok` value and returns it. Errors are never
    /// cached.
    pub async fn get_or_insert_with<K, T, E, F, Fut>(
        &self,
        namespace: &str,
        params: &K,
        loader: F,
    ) -> Result<T, E>
    where
        K: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.is_enabled() {
            return loader().await;
        }

        let key = match Self::key(namespace, params) {
            Ok(key) => key,
            Err(e) => {
                warn!(namespace = %namespace, error = %e, "Failed to build cache key, bypassing cache");
                return loader().await;
            },
        };

        if let Some(cached) = self.get(&key) {
            return Ok(cached);
        }

        let value = loader().await?;
        self.insert(key, &value);
        Ok(value)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.inner
            .entries
            .lock()
            .map(|mut entries| entries.pop(key).is_some())
            .unwrap_or(false)
    }

    /// Remove every entry, returning how many were dropped
    pub fn clear(&self) -> usize {
        match self.inner.entries.lock() {
            Ok(mut entries) => {
                let count = entries.len();
                entries.clear();
                info!(count, "Cleared response cache");
                count
            },
            Err(_) => 0,
        }
    }

    /// Remove every entry in `namespace`, returning how many were dropped
    pub fn clear_namespace(&self, namespace: &str) -> usize {
        let prefix = format!("{}:", namespace);
        match self.inner.entries.lock() {
            Ok(mut entries) => {
                let keys: Vec<String> = entries
                    .iter()
                    .filter(|(key, _)| key.starts_with(&prefix))
                    .map(|(key, _)| key.clone())
                    .collect();
                for key in &keys {
                    entries.pop(key);
                }
                info!(namespace = %namespace, count = keys.len(), "Cleared cache namespace");
                keys.len()
            },
            Err(_) => 0,
        }
    }

    /// Drop entries whose expiry has passed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        match self.inner.entries.lock() {
            Ok(mut entries) => {
                let expired: Vec<String> = entries
                    .iter()
                    .filter(|(_, entry)| entry.expires_at <= now)
                    .map(|(key, _)| key.clone())
                    .collect();
                for key in &expired {
                    entries.pop(key);
                }
                if !expired.is_empty() {
                    debug!(count = expired.len(), "Purged expired cache entries");
                }
                expired.len()
            },
            Err(_) => 0,
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats_at(Utc::now())
    }

    fn stats_at(&self, now: DateTime<Utc>) -> CacheStats {
        let (total, expired) = self
            .inner
            .entries
            .lock()
            .map(|entries| {
                let expired = entries.iter().filter(|(_, e)| e.expires_at <= now).count();
                (entries.len(), expired)
            })
            .unwrap_or((0, 0));

        CacheStats {
            enabled: self.is_enabled(),
            capacity: self.inner.config.max_entries,
            total_entries: total,
            expired_entries: expired,
            valid_entries: total - expired,
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            schedule: self.inner.config.schedule,
        }
    }
}

impl std::fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCache")
            .field("enabled", &self.inner.config.enabled)
            .field("ttl_secs", &self.inner.config.ttl_secs)
            .field("schedule", &self.inner.config.schedule)
            .finish()
    }
}

/// Periodically sweep expired entries so they do not hold memory until
/// they are next looked up or evicted.
pub fn spawn_purge_task(cache: ContentCache, interval: std::time::Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            cache.purge_expired();
        }
    })
}
