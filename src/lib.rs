//! Trivy Report Cache
//!
//! Aggregates the security-report custom resources published by the Trivy
//! operator, flattens them into tables and serves them to a dashboard from
//! a TTL cache.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        REST API (axum)                           │
//! │     /v1/crds        /v1/reports/:plural        /metrics          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────┐        ┌──────────────────────────┐    │
//! │  │  CRD Discovery       │        │  Report Fetch            │    │
//! │  │  (cluster-scoped)    │        │  (scope-aware listing)   │    │
//! │  └──────────┬───────────┘        └────────────┬─────────────┘    │
//! │             │   columns + jsonpath projection │                  │
//! │             └───────────────┬─────────────────┘                  │
//! │                  ┌──────────┴──────────┐                         │
//! │                  │    Report Cache     │  trivy_crds             │
//! │                  │  (TTL, negative)    │  reports:<plural>       │
//! │                  └──────────┬──────────┘                         │
//! ├─────────────────────────────┼────────────────────────────────────┤
//! │   ┌─────────────────┐   ┌───┴─────────────┐                      │
//! │   │  Kubernetes API │   │  Redis / Memory │                      │
//! │   └─────────────────┘   └─────────────────┘                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`reports`]: discovery, fetch, column projection and warm-up
//! - [`cache`]: cache keys, typed cache and storage backends
//! - [`kubernetes`]: cluster API adapter and cluster identity
//! - [`api`]: REST surface
//! - [`domain`]: data model and ports
//! - [`error`]: Error types and handling

pub mod api;
pub mod cache;
pub mod domain;
pub mod error;
pub mod kubernetes;
pub mod reports;

// Re-export commonly used types
pub use api::{ApiServer, ApiServerConfig, AppState};

pub use cache::{CacheBackend, CacheConfig, CacheKey, MemoryStore, RedisStore, ReportCache};

pub use domain::model::{
    ColumnDefinition, CrdMetadata, CrdScope, Outcome, ReportScope, ReportsData, UNKNOWN_CLUSTER,
};
pub use domain::ports::{CacheStore, CacheStoreRef, ClusterApi, ClusterApiRef};

pub use error::{Error, Result};

pub use kubernetes::{resolve_cluster_name, KubeClusterApi};

pub use reports::prefetch::WarmConfig;
pub use reports::{CacheWarmer, CrdDiscoveryService, ReportService, ReportsConfig, WarmSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
