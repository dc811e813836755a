//! In-Process Storage
//!
//! DashMap-backed store for single-replica deployments without a cache
//! server. Expiry is lazy: an entry is checked when it is read, and every
//! write sweeps out entries that have already expired. There is no
//! background task.

use crate::cache::entry::StoredEntry;
use crate::domain::ports::CacheStore;
use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tracing::debug;

// =============================================================================
// Memory Store
// =============================================================================

/// In-process cache store
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, StoredEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired ones included
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            // Re-check under the write lock: a concurrent set may have replaced it
            self.entries.remove_if(key, |_, entry| entry.is_expired());
            debug!(key = %key, "Dropped expired cache entry");
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        // Keys nobody reads again would otherwise stay forever
        let before = self.entry_count();
        self.entries.retain(|_, entry| !entry.is_expired());
        let swept = before.saturating_sub(self.entry_count());
        if swept > 0 {
            debug!(swept, "Swept expired cache entries");
        }

        self.entries.insert(key.to_string(), StoredEntry::new(value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn close(&self) {
        self.entries.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
