//! Cache Warm-up
//!
//! Pre-loads the report cache at start-up so the first dashboard requests
//! are served from cache. Loads go through [`ReportService::load_reports`],
//! so a warmed error payload is negatively cached like any other.

use crate::reports::discovery::CrdDiscoveryService;
use crate::reports::fetch::ReportService;
use crate::reports::NAMESPACED_REPORT_PLURALS;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

// =============================================================================
// Warm-up Configuration
// =============================================================================

/// Configuration for the cache warmer
#[derive(Debug, Clone)]
pub struct WarmConfig {
    /// Maximum concurrent report loads
    pub max_concurrent: usize,
    /// Plurals loaded in addition to the discovered CRDs
    pub extra_plurals: Vec<String>,
}

impl Default for WarmConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            extra_plurals: NAMESPACED_REPORT_PLURALS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Result of one warm-up run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarmSummary {
    /// Plurals whose reports loaded cleanly
    pub loaded: Vec<String>,
    /// Plurals that produced an error payload
    pub failed: Vec<String>,
}

impl WarmSummary {
    pub fn total(&self) -> usize {
        self.loaded.len() + self.failed.len()
    }
}

// =============================================================================
// Cache Warmer
// =============================================================================

pub struct CacheWarmer {
    discovery: Arc<CrdDiscoveryService>,
    reports: Arc<ReportService>,
    config: WarmConfig,
}

impl CacheWarmer {
    pub fn new(discovery: Arc<CrdDiscoveryService>, reports: Arc<ReportService>, config: WarmConfig) -> Self {
        Self {
            discovery,
            reports,
            config,
        }
    }

    /// Plurals to warm: discovered CRDs first, then the extras, deduplicated
    pub async fn targets(&self) -> Vec<String> {
        let mut plurals: Vec<String> = self
            .discovery
            .list_relevant_crds()
            .await
            .into_iter()
            .map(|crd| crd.plural)
            .collect();
        for extra in &self.config.extra_plurals {
            if !plurals.contains(extra) {
                plurals.push(extra.clone());
            }
        }
        plurals
    }

    /// Load every target into the cache with bounded concurrency
    pub async fn warm(&self) -> WarmSummary {
        let started = Instant::now();
        let targets = self.targets().await;
        let concurrency = self.config.max_concurrent.max(1);

        let results: Vec<(String, bool)> = stream::iter(targets)
            .map(|plural| {
                let reports = self.reports.clone();
                async move {
                    let data = reports.load_reports(&plural).await;
                    let ok = !data.is_error();
                    (plural, ok)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut summary = WarmSummary::default();
        for (plural, ok) in results {
            if ok {
                summary.loaded.push(plural);
            } else {
                summary.failed.push(plural);
            }
        }
        summary.loaded.sort();
        summary.failed.sort();

        if !summary.failed.is_empty() {
            warn!(failed = ?summary.failed, "Some report caches warmed with errors");
        }
        info!(
            loaded = summary.loaded.len(),
            failed = summary.failed.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Cache warm-up complete"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStore, ReportCache};
    use crate::kubernetes::mock::{count, report_crd, report_object, MockClusterApi};
    use crate::reports::ReportsConfig;

    const GROUP: &str = "aquasecurity.github.io";

    fn warmer(api: Arc<MockClusterApi>, extra: &[&str]) -> (CacheWarmer, Arc<ReportService>) {
        let cache = ReportCache::new(Arc::new(MemoryStore::new()));
        let discovery = Arc::new(CrdDiscoveryService::new(
            api.clone(),
            cache.clone(),
            ReportsConfig::default(),
        ));
        let reports = Arc::new(ReportService::new(api, cache, ReportsConfig::default(), "kind-dev"));
        let config = WarmConfig {
            max_concurrent: 2,
            extra_plurals: extra.iter().map(|p| p.to_string()).collect(),
        };
        (CacheWarmer::new(discovery, reports.clone(), config), reports)
    }

    fn api() -> MockClusterApi {
        MockClusterApi::new()
            .with_crd(report_crd(GROUP, "clustercompliancereports", "Cluster", None))
            .with_crd(report_crd(GROUP, "vulnerabilityreports", "Namespaced", None))
            .with_objects("vulnerabilityreports", vec![report_object("default", "a", 1)])
    }

    #[test]
    fn test_default_config_covers_namespaced_reports() {
        let config = WarmConfig::default();
        assert_eq!(config.max_concurrent, 4);
        assert!(config.extra_plurals.iter().any(|p| p == "vulnerabilityreports"));
    }

    #[tokio::test]
    async fn test_targets_deduplicated() {
        let api = Arc::new(api());
        let (warmer, _) = warmer(api, &["vulnerabilityreports", "clustercompliancereports"]);

        assert_eq!(
            warmer.targets().await,
            vec!["clustercompliancereports", "vulnerabilityreports"]
        );
    }

    #[tokio::test]
    async fn test_warm_fills_cache() {
        let api = Arc::new(api());
        let (warmer, reports) = warmer(api.clone(), &["vulnerabilityreports", "sbomreports"]);

        let summary = warmer.warm().await;
        assert_eq!(summary.loaded, vec!["clustercompliancereports", "vulnerabilityreports"]);
        assert_eq!(summary.failed, vec!["sbomreports"]);
        assert_eq!(summary.total(), 3);

        // Every target, failed ones included, is now cached
        let get_crd_calls = count(&api.calls.get_crd);
        reports.load_reports("vulnerabilityreports").await;
        reports.load_reports("sbomreports").await;
        assert_eq!(count(&api.calls.get_crd), get_crd_calls);
    }
}
