//! Report Fetch Service
//!
//! Loads every instance of one report CRD, projects them through the CRD's
//! printer columns and assembles a [`ReportsData`] payload.
//!
//! Degradation policy per step:
//!
//! | Step                    | On failure                              |
//! |-------------------------|-----------------------------------------|
//! | Get CRD by name         | error payload, negatively cached        |
//! | Find target version     | error payload, negatively cached        |
//! | Project columns         | fall back to name and age columns       |
//! | List instances          | empty list plus warning, still loaded   |

use crate::cache::{CacheKey, ReportCache};
use crate::domain::model::{CrdScope, Outcome, ReportsData};
use crate::domain::ports::ClusterApiRef;
use crate::error::{Error, Result};
use crate::reports::columns::{columns_or_default, find_version, project_record};
use crate::reports::ReportsConfig;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Cached loading of report instances
pub struct ReportService {
    api: ClusterApiRef,
    cache: ReportCache,
    config: ReportsConfig,
    /// Resolved once at start-up
    cluster_name: String,
}

impl ReportService {
    pub fn new(
        api: ClusterApiRef,
        cache: ReportCache,
        config: ReportsConfig,
        cluster_name: impl Into<String>,
    ) -> Self {
        Self {
            api,
            cache,
            config,
            cluster_name: cluster_name.into(),
        }
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    /// Reports of one CRD, from cache when fresh
    ///
    /// Never fails: schema problems come back as an error payload, which is
    /// cached for the full TTL like any other result.
    pub async fn load_reports(&self, plural: &str) -> ReportsData {
        let key = CacheKey::reports(plural);
        if let Some(data) = self.cache.get::<ReportsData>(&key).await {
            return data;
        }

        let data = match self.fetch(plural).await {
            Ok(outcome) => {
                for warning in &outcome.warnings {
                    warn!(plural = %plural, "{}", warning);
                }
                info!(
                    plural = %plural,
                    count = outcome.value.manifests.len(),
                    scope = %outcome.value.scope,
                    "Loaded reports"
                );
                outcome.into_inner()
            }
            Err(e) => {
                if e.is_transient() {
                    warn!(plural = %plural, error = %e, "Failed to load reports");
                } else {
                    error!(plural = %plural, error = %e, "Failed to load reports");
                }
                ReportsData::failed(plural, e.to_string())
            }
        };

        self.cache.set(&key, &data).await;
        data
    }

    /// Query the cluster, bypassing the cache
    ///
    /// Returns `Err` only when the CRD or its target version cannot be
    /// resolved. A failed instance listing degrades to an empty report.
    pub async fn fetch(&self, plural: &str) -> Result<Outcome<ReportsData>> {
        let crd_name = self.config.crd_name(plural);
        let crd = self.api.get_crd(&crd_name).await?;

        if crd.spec.versions.is_empty() {
            return Err(Error::SchemaMissing { crd: crd_name });
        }
        let version = find_version(&crd, &self.config.version).ok_or_else(|| Error::VersionNotFound {
            crd: crd_name.clone(),
            version: self.config.version.clone(),
        })?;

        let columns = columns_or_default(Some(version));
        let scope = CrdScope::from_spec(&crd.spec.scope);
        debug!(plural = %plural, scope = %scope, columns = columns.len(), "Resolved report schema");

        let (objects, warnings) = match self.list_instances(plural, scope).await {
            Ok(objects) => (objects, Vec::new()),
            Err(e) => (
                Vec::new(),
                vec![format!("Failed to list {} instances: {}", plural, e)],
            ),
        };

        let manifests = objects
            .iter()
            .map(|object| project_record(object, &columns))
            .collect();

        Ok(Outcome {
            value: ReportsData::loaded(plural, &self.cluster_name, scope, manifests),
            warnings,
        })
    }

    async fn list_instances(&self, plural: &str, scope: CrdScope) -> Result<Vec<Value>> {
        let (group, version) = (&self.config.group, &self.config.version);
        if scope.is_namespaced() {
            self.api
                .list_namespaced_custom_objects_all(group, version, plural)
                .await
        } else {
            self.api
                .list_cluster_custom_objects(group, version, plural)
                .await
        }
    }

    /// Drop the cached reports of one CRD
    ///
    /// Leaves the discovery cache untouched.
    pub async fn invalidate_cache(&self, plural: &str) -> bool {
        self.cache.invalidate(&CacheKey::reports(plural)).await
    }

    /// One raw report object for detail views, never cached
    pub async fn get_report(&self, plural: &str, namespace: &str, name: &str) -> Result<Value> {
        self.api
            .get_namespaced_custom_object(&self.config.group, &self.config.version, namespace, plural, name)
            .await
    }
}
