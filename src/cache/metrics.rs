//! Cache Metrics
//!
//! Prometheus counters for cache lookups, writes and invalidations, with a
//! plain snapshot for tests and logs.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

// =============================================================================
// Lookup Result Labels
// =============================================================================

const HIT: &str = "hit";
const MISS: &str = "miss";
const ERROR: &str = "error";

// =============================================================================
// Cache Metrics
// =============================================================================

/// Counters for one cache instance, labelled by key family
#[derive(Clone)]
pub struct CacheMetrics {
    registry: Registry,
    lookups: IntCounterVec,
    writes: IntCounterVec,
    invalidations: IntCounterVec,
}

impl CacheMetrics {
    /// Create metrics in a fresh registry
    pub fn new() -> Self {
        let registry = Registry::new();

        let lookups = IntCounterVec::new(
            Opts::new("report_cache_lookups_total", "Cache lookups by key family and result"),
            &["family", "result"],
        )
        .expect("valid metric definition");
        let writes = IntCounterVec::new(
            Opts::new("report_cache_writes_total", "Cache writes by key family and result"),
            &["family", "result"],
        )
        .expect("valid metric definition");
        let invalidations = IntCounterVec::new(
            Opts::new("report_cache_invalidations_total", "Explicit cache invalidations"),
            &["family"],
        )
        .expect("valid metric definition");

        for collector in [&lookups, &writes, &invalidations] {
            // Only fails on duplicate registration, impossible in a fresh registry
            let _ = registry.register(Box::new(collector.clone()));
        }

        Self {
            registry,
            lookups,
            writes,
            invalidations,
        }
    }

    #[inline]
    pub fn record_hit(&self, family: &str) {
        self.lookups.with_label_values(&[family, HIT]).inc();
    }

    #[inline]
    pub fn record_miss(&self, family: &str) {
        self.lookups.with_label_values(&[family, MISS]).inc();
    }

    /// A lookup that failed in the store or could not be decoded
    #[inline]
    pub fn record_lookup_error(&self, family: &str) {
        self.lookups.with_label_values(&[family, ERROR]).inc();
    }

    #[inline]
    pub fn record_write(&self, family: &str, ok: bool) {
        let result = if ok { "ok" } else { ERROR };
        self.writes.with_label_values(&[family, result]).inc();
    }

    #[inline]
    pub fn record_invalidation(&self, family: &str) {
        self.invalidations.with_label_values(&[family]).inc();
    }

    /// Render every counter in the Prometheus text format
    pub fn encode(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if encoder.encode(&self.registry.gather(), &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    /// Create a snapshot of current counters, summed over key families
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let mut snapshot = CacheStatsSnapshot::default();
        for family in self.registry.gather() {
            for metric in family.get_metric() {
                let value = metric.get_counter().get_value() as u64;
                let result = metric
                    .get_label()
                    .iter()
                    .find(|l| l.get_name() == "result")
                    .map(|l| l.get_value());
                match (family.get_name(), result) {
                    ("report_cache_lookups_total", Some(HIT)) => snapshot.hits += value,
                    ("report_cache_lookups_total", Some(MISS)) => snapshot.misses += value,
                    ("report_cache_lookups_total", Some(ERROR)) => snapshot.errors += value,
                    ("report_cache_writes_total", Some(ERROR)) => snapshot.write_errors += value,
                    ("report_cache_writes_total", _) => snapshot.writes += value,
                    ("report_cache_invalidations_total", _) => snapshot.invalidations += value,
                    _ => {}
                }
            }
        }
        snapshot
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Stats Snapshot
// =============================================================================

/// Point-in-time snapshot of cache counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    /// Lookups that failed in the store or could not be decoded
    pub errors: u64,
    pub writes: u64,
    /// Writes that failed to encode or reach the store
    pub write_errors: u64,
    pub invalidations: u64,
}

impl CacheStatsSnapshot {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get total lookups (hits + misses + errors)
    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses + self.errors
    }
}
