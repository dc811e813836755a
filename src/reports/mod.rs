//! Security Report Aggregation
//!
//! Discovers the vendor's report CRDs, loads their instances and flattens
//! them into tables, with every result going through the report cache.
//!
//! # Flow
//!
//! ```text
//!  list_relevant_crds / load_reports
//!              │
//!      ┌───────┴────────┐   hit
//!      │  ReportCache   │──────────► cached payload
//!      └───────┬────────┘
//!              │ miss
//!      ┌───────┴────────┐
//!      │  ClusterApi    │  list CRDs / get CRD / list objects
//!      └───────┬────────┘
//!              │
//!      columns + jsonpath projection
//!              │
//!      write back with TTL ──────────► payload
//! ```

pub mod columns;
pub mod discovery;
pub mod fetch;
pub mod jsonpath;
pub mod prefetch;

pub use discovery::CrdDiscoveryService;
pub use fetch::ReportService;
pub use prefetch::{CacheWarmer, WarmSummary};

/// API group of the Trivy operator's report CRDs
pub const VENDOR_GROUP: &str = "aquasecurity.github.io";

/// Schema version the reports are read at
pub const TARGET_VERSION: &str = "v1alpha1";

/// Prefix of the discovery cache key
pub const VENDOR_KEY: &str = "trivy";

/// Namespaced report kinds published by the Trivy operator
///
/// Discovery only returns cluster-scoped CRDs, so these are warmed
/// explicitly.
pub const NAMESPACED_REPORT_PLURALS: &[&str] = &[
    "vulnerabilityreports",
    "configauditreports",
    "exposedsecretreports",
    "rbacassessmentreports",
    "infraassessmentreports",
    "sbomreports",
];

// =============================================================================
// Configuration
// =============================================================================

/// Which CRDs the services look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportsConfig {
    /// API group the report CRDs belong to
    pub group: String,
    /// Schema version columns and objects are read at
    pub version: String,
    /// Vendor name used in the discovery cache key
    pub vendor: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            group: VENDOR_GROUP.to_string(),
            version: TARGET_VERSION.to_string(),
            vendor: VENDOR_KEY.to_string(),
        }
    }
}

impl ReportsConfig {
    /// Full CRD name of a report plural (`<plural>.<group>`)
    pub fn crd_name(&self, plural: &str) -> String {
        format!("{}.{}", plural, self.group)
    }
}
