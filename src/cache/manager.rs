//! Report Cache Manager
//!
//! Typed read-through/write-through layer over a [`CacheStore`]. Payloads
//! are JSON text in the store. Store failures never reach the caller: a
//! failed read is a miss and a failed write is only logged.

use crate::cache::entry::CacheKey;
use crate::cache::metrics::{CacheMetrics, CacheStatsSnapshot};
use crate::cache::CacheLookupResult;
use crate::domain::ports::CacheStoreRef;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default time-to-live for cached payloads
pub const DEFAULT_TTL: Duration = Duration::from_secs(1800);

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the report cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live applied to every write
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

// =============================================================================
// Report Cache
// =============================================================================

/// Shared handle to the cache store
///
/// Cheap to clone; every clone talks to the same store and metrics.
#[derive(Clone)]
pub struct ReportCache {
    store: CacheStoreRef,
    metrics: Arc<CacheMetrics>,
    config: CacheConfig,
}

impl ReportCache {
    /// Create a cache over `store` with default configuration
    pub fn new(store: CacheStoreRef) -> Self {
        Self::with_config(store, CacheConfig::default())
    }

    /// Create a cache over `store` with custom configuration
    pub fn with_config(store: CacheStoreRef, config: CacheConfig) -> Self {
        Self {
            store,
            metrics: Arc::new(CacheMetrics::new()),
            config,
        }
    }

    /// TTL applied to writes
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Look up and decode a payload
    pub async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> CacheLookupResult<T> {
        let storage_key = key.to_storage_key();

        let raw = match self.store.get(&storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.metrics.record_miss(key.family());
                return CacheLookupResult::Miss;
            }
            Err(e) => {
                warn!(key = %key, backend = self.store.backend(), error = %e, "Cache lookup failed");
                self.metrics.record_lookup_error(key.family());
                return CacheLookupResult::Miss;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key = %key, "Cache hit");
                self.metrics.record_hit(key.family());
                CacheLookupResult::Hit(value)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable cache payload");
                self.metrics.record_lookup_error(key.family());
                CacheLookupResult::Miss
            }
        }
    }

    /// Look up a payload, returning `None` on any miss
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        self.lookup(key).await.into_value()
    }

    /// Encode and store a payload with the configured TTL
    ///
    /// Returns whether the write reached the store.
    pub async fn set<T: Serialize>(&self, key: &CacheKey, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode cache payload");
                self.metrics.record_write(key.family(), false);
                return false;
            }
        };

        match self.store.set(&key.to_storage_key(), raw, self.config.ttl).await {
            Ok(()) => {
                debug!(key = %key, ttl_secs = self.config.ttl.as_secs(), "Stored cache entry");
                self.metrics.record_write(key.family(), true);
                true
            }
            Err(e) => {
                warn!(key = %key, backend = self.store.backend(), error = %e, "Cache write failed");
                self.metrics.record_write(key.family(), false);
                false
            }
        }
    }

    /// Drop a cached payload
    ///
    /// Idempotent; returns true if an entry was removed.
    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        self.metrics.record_invalidation(key.family());
        match self.store.delete(&key.to_storage_key()).await {
            Ok(removed) => {
                debug!(key = %key, removed, "Invalidated cache entry");
                removed
            }
            Err(e) => {
                warn!(key = %key, backend = self.store.backend(), error = %e, "Cache invalidation failed");
                false
            }
        }
    }

    /// Check if the store is reachable
    pub async fn health_check(&self) -> bool {
        self.store.health_check().await.unwrap_or(false)
    }

    /// Close the store connection
    pub async fn close(&self) {
        self.store.close().await;
    }

    /// Get current cache statistics
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.metrics.snapshot()
    }

    /// Prometheus text exposition of the cache counters
    pub fn encode_metrics(&self) -> String {
        self.metrics.encode()
    }
}
