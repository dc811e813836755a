//! CRD Discovery Service
//!
//! Lists the vendor's cluster-scoped report CRDs with their columns.
//! Namespaced report CRDs are left to per-resource loading.

use crate::cache::{CacheKey, ReportCache};
use crate::domain::model::{CrdMetadata, CrdScope, Outcome};
use crate::domain::ports::ClusterApiRef;
use crate::reports::columns::{find_version, project_columns};
use crate::reports::ReportsConfig;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use tracing::{debug, info, warn};

/// Cached discovery of report CRDs
pub struct CrdDiscoveryService {
    api: ClusterApiRef,
    cache: ReportCache,
    config: ReportsConfig,
}

impl CrdDiscoveryService {
    pub fn new(api: ClusterApiRef, cache: ReportCache, config: ReportsConfig) -> Self {
        Self { api, cache, config }
    }

    /// Key of the cached CRD list
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::crd_list(&self.config.vendor)
    }

    /// Relevant CRDs, from cache when fresh
    ///
    /// Never fails. A cluster error yields an empty list, which is not
    /// cached so the next call retries.
    pub async fn list_relevant_crds(&self) -> Vec<CrdMetadata> {
        let key = self.cache_key();
        if let Some(crds) = self.cache.get::<Vec<CrdMetadata>>(&key).await {
            return crds;
        }

        let outcome = self.discover().await;
        if outcome.is_degraded() {
            for warning in &outcome.warnings {
                warn!(group = %self.config.group, "{}", warning);
            }
            return outcome.into_inner();
        }

        info!(group = %self.config.group, count = outcome.value.len(), "Discovered report CRDs");
        self.cache.set(&key, &outcome.value).await;
        outcome.into_inner()
    }

    /// Query the cluster, bypassing the cache
    ///
    /// All or nothing: a failed listing degrades to an empty list.
    pub async fn discover(&self) -> Outcome<Vec<CrdMetadata>> {
        match self.api.list_crds().await {
            Ok(crds) => Outcome::clean(select_crds(&crds, &self.config)),
            Err(e) => Outcome::degraded(Vec::new(), format!("Failed to list CRDs: {}", e)),
        }
    }

    /// Drop the cached CRD list
    pub async fn invalidate(&self) -> bool {
        self.cache.invalidate(&self.cache_key()).await
    }
}

/// Keep cluster-scoped CRDs of the configured group, in listing order
pub fn select_crds(crds: &[CustomResourceDefinition], config: &ReportsConfig) -> Vec<CrdMetadata> {
    crds.iter()
        .filter(|crd| crd.spec.group == config.group)
        .filter(|crd| !CrdScope::from_spec(&crd.spec.scope).is_namespaced())
        .map(|crd| {
            let plural = crd.spec.names.plural.clone();
            let version = find_version(crd, &config.version);
            if version.is_none() {
                debug!(plural = %plural, version = %config.version, "CRD does not serve target version");
            }
            CrdMetadata {
                group: config.group.clone(),
                plural,
                columns: project_columns(version),
                scope: CrdScope::from_spec(&crd.spec.scope),
            }
        })
        .collect()
}
