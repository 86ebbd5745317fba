//! In-process adapter backed by moka.
//!
//! [`MemoryAdapter`] implements [`CacheAdapter`] on top of
//! `moka::future::Cache`, with each entry carrying its own TTL and moka's
//! expiry policy reading it back out. An entry stored with
//! `Duration::ZERO` falls back to the adapter's configured default TTL
//! (or never expires if none is set).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;

use super::CacheAdapter;
use crate::error::Result;

/// Default maximum number of entries held by a [`MemoryAdapter`].
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Configuration for [`MemoryAdapter`].
///
/// ```rust
/// # use muninn::adapter::MemoryAdapterConfig;
/// # use std::time::Duration;
/// let config = MemoryAdapterConfig::new()
///     .max_entries(1_000)
///     .default_ttl(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryAdapterConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// TTL applied to entries stored with `Duration::ZERO`.
    /// Default: `None` (such entries never expire).
    pub default_ttl: Option<Duration>,
}

impl Default for MemoryAdapterConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl: None,
        }
    }
}

impl MemoryAdapterConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the TTL applied to entries stored without an explicit one.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }
}

/// A cached value plus the TTL it was stored with.
///
/// `ttl` of `None` means the entry was stored with `Duration::ZERO` and
/// expires per the adapter default.
#[derive(Clone)]
struct StoredEntry {
    value: Value,
    ttl: Option<Duration>,
}

/// Reads each entry's own TTL; falls back to the configured default.
struct PerEntryExpiry {
    default_ttl: Option<Duration>,
}

impl moka::Expiry<String, StoredEntry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl.or(self.default_ttl)
    }
}

/// In-process [`CacheAdapter`] with per-entry TTL.
///
/// Thread-safe (moka handles concurrent access internally) and infallible —
/// there is no backend to become unavailable, so `get`/`set` never error.
pub struct MemoryAdapter {
    entries: Cache<String, StoredEntry>,
}

impl MemoryAdapter {
    /// Create an adapter with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&MemoryAdapterConfig::default())
    }

    /// Create an adapter from the given configuration.
    pub fn with_config(config: &MemoryAdapterConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(PerEntryExpiry {
                default_ttl: config.default_ttl,
            })
            .build();
        Self { entries }
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheAdapter for MemoryAdapter {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let ttl = if ttl.is_zero() { None } else { Some(ttl) };
        self.entries
            .insert(key.to_string(), StoredEntry { value, ttl })
            .await;
        Ok(())
    }
}
