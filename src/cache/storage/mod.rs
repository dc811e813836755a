//! Cache Storage Backends
//!
//! Implementations of the [`CacheStore`] port.

mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

use crate::domain::ports::{CacheStore, CacheStoreRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// =============================================================================
// Backend Selection
// =============================================================================

/// Which store backs the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Shared Redis server
    #[default]
    Redis,
    /// Per-process map, for single-replica deployments
    Memory,
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBackend::Redis => write!(f, "redis"),
            CacheBackend::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" | "in-memory" => Ok(CacheBackend::Memory),
            other => Err(format!("unknown cache backend: {}", other)),
        }
    }
}

/// Build the store for a backend
///
/// Never fails: an unreachable Redis server yields a store whose operations
/// all error out.
pub async fn connect(backend: CacheBackend, redis_url: &str) -> CacheStoreRef {
    match backend {
        CacheBackend::Redis => Arc::new(RedisStore::connect(redis_url).await) as Arc<dyn CacheStore>,
        CacheBackend::Memory => Arc::new(MemoryStore::new()),
    }
}
