//! Cache Entry Types
//!
//! Defines cache keys and the entries held by the in-process store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Prefix of the per-CRD report key family
const REPORTS_PREFIX: &str = "reports:";

/// Suffix of the discovery list key family
const CRDS_SUFFIX: &str = "_crds";

// =============================================================================
// Cache Key
// =============================================================================

/// Identifier for cached payloads
///
/// Two independent families: the discovery list of one vendor and the report
/// payload of one CRD. Invalidating one never touches the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKey {
    /// Discovered CRD list, stored as `<vendor>_crds`
    CrdList { vendor: String },
    /// Reports of one CRD, stored as `reports:<plural>`
    Reports { plural: String },
}

impl CacheKey {
    /// Key of a vendor's CRD list
    pub fn crd_list(vendor: impl Into<String>) -> Self {
        CacheKey::CrdList {
            vendor: vendor.into(),
        }
    }

    /// Key of one CRD's report payload
    pub fn reports(plural: impl Into<String>) -> Self {
        CacheKey::Reports {
            plural: plural.into(),
        }
    }

    /// Get a string representation for storage
    pub fn to_storage_key(&self) -> String {
        match self {
            CacheKey::CrdList { vendor } => format!("{}{}", vendor, CRDS_SUFFIX),
            CacheKey::Reports { plural } => format!("{}{}", REPORTS_PREFIX, plural),
        }
    }

    /// Family label for metrics
    pub fn family(&self) -> &'static str {
        match self {
            CacheKey::CrdList { .. } => "crds",
            CacheKey::Reports { .. } => "reports",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_storage_key())
    }
}

// =============================================================================
// Stored Entry
// =============================================================================

/// A serialized payload with the time it was written
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// Serialized payload
    pub value: String,
    /// Time when entry was stored
    pub stored_at: Instant,
    /// Time-to-live
    pub ttl: Duration,
}

impl StoredEntry {
    /// Create an entry stamped with the current time
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// Check if the entry has expired
    pub fn is_expired(&self) -> bool {
        self.age() >= self.ttl
    }

    /// Time since the entry was stored
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.stored_at)
    }
}
