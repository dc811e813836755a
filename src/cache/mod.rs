//! Report Caching Layer
//!
//! Read-through/write-through cache in front of CRD discovery and report
//! fetching. Two stores are available:
//! - **Redis**: shared network store, expiry enforced by the server
//! - **Memory**: per-process map, expiry checked lazily on read
//!
//! # Key families
//!
//! ```text
//! trivy_crds                     -> Vec<CrdMetadata>
//! reports:vulnerabilityreports   -> ReportsData
//! ```
//!
//! The families are independent: invalidating one never touches the other.
//!
//! # Usage
//!
//! ```ignore
//! use trivy_report_cache::cache::{storage::MemoryStore, CacheKey, ReportCache};
//!
//! let cache = ReportCache::new(Arc::new(MemoryStore::new()));
//! let key = CacheKey::reports("vulnerabilityreports");
//!
//! cache.set(&key, &reports).await;
//! let cached: Option<ReportsData> = cache.get(&key).await;
//! cache.invalidate(&key).await;
//! ```

pub mod entry;
pub mod manager;
pub mod metrics;
pub mod storage;

// Re-export main types
pub use entry::{CacheKey, StoredEntry};
pub use manager::{CacheConfig, ReportCache, DEFAULT_TTL};
pub use metrics::{CacheMetrics, CacheStatsSnapshot};
pub use storage::{CacheBackend, MemoryStore, RedisStore};

// =============================================================================
// Cache Lookup Result
// =============================================================================

/// Result of a cache lookup operation
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookupResult<T> {
    /// Cache hit with the decoded payload
    Hit(T),
    /// Not cached, expired, or unreadable
    Miss,
}

impl<T> CacheLookupResult<T> {
    /// Get the payload if this is a hit
    pub fn into_value(self) -> Option<T> {
        match self {
            CacheLookupResult::Hit(value) => Some(value),
            CacheLookupResult::Miss => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
