//! In-memory [`ClusterApi`] for tests
//!
//! Serves canned CRDs and custom objects and counts every call.

use crate::domain::ports::ClusterApi;
use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Call counters, one per port method
#[derive(Debug, Default)]
pub struct CallCounts {
    pub list_crds: AtomicUsize,
    pub get_crd: AtomicUsize,
    pub list_cluster: AtomicUsize,
    pub list_namespaced: AtomicUsize,
    pub get_object: AtomicUsize,
}

/// Read a call counter
pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

#[derive(Default)]
pub struct MockClusterApi {
    crds: Vec<CustomResourceDefinition>,
    objects: BTreeMap<String, Vec<Value>>,
    fail_list_crds: bool,
    fail_listing: BTreeSet<String>,
    pub calls: CallCounts,
}

impl MockClusterApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crd(mut self, crd: CustomResourceDefinition) -> Self {
        self.crds.push(crd);
        self
    }

    pub fn with_objects(mut self, plural: &str, objects: Vec<Value>) -> Self {
        self.objects.insert(plural.to_string(), objects);
        self
    }

    pub fn failing_list_crds(mut self) -> Self {
        self.fail_list_crds = true;
        self
    }

    pub fn failing_listing(mut self, plural: &str) -> Self {
        self.fail_listing.insert(plural.to_string());
        self
    }

    fn list(&self, plural: &str) -> Result<Vec<Value>> {
        if self.fail_listing.contains(plural) {
            return Err(Error::Internal(format!("listing {} timed out", plural)));
        }
        Ok(self.objects.get(plural).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ClusterApi for MockClusterApi {
    async fn list_crds(&self) -> Result<Vec<CustomResourceDefinition>> {
        self.calls.list_crds.fetch_add(1, Ordering::SeqCst);
        if self.fail_list_crds {
            return Err(Error::Internal("connection refused".into()));
        }
        Ok(self.crds.clone())
    }

    async fn get_crd(&self, name: &str) -> Result<CustomResourceDefinition> {
        self.calls.get_crd.fetch_add(1, Ordering::SeqCst);
        self.crds
            .iter()
            .find(|crd| crd.metadata.name.as_deref() == Some(name))
            .cloned()
            .ok_or_else(|| Error::ResourceNotFound {
                kind: "CustomResourceDefinition".into(),
                name: name.into(),
            })
    }

    async fn list_cluster_custom_objects(
        &self,
        _group: &str,
        _version: &str,
        plural: &str,
    ) -> Result<Vec<Value>> {
        self.calls.list_cluster.fetch_add(1, Ordering::SeqCst);
        self.list(plural)
    }

    async fn list_namespaced_custom_objects_all(
        &self,
        _group: &str,
        _version: &str,
        plural: &str,
    ) -> Result<Vec<Value>> {
        self.calls.list_namespaced.fetch_add(1, Ordering::SeqCst);
        self.list(plural)
    }

    async fn get_namespaced_custom_object(
        &self,
        _group: &str,
        _version: &str,
        namespace: &str,
        plural: &str,
        name: &str,
    ) -> Result<Value> {
        self.calls.get_object.fetch_add(1, Ordering::SeqCst);
        self.list(plural)?
            .into_iter()
            .find(|obj| {
                obj["metadata"]["namespace"] == json!(namespace) && obj["metadata"]["name"] == json!(name)
            })
            .ok_or_else(|| Error::ResourceNotFound {
                kind: plural.into(),
                name: format!("{}/{}", namespace, name),
            })
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A report CRD in `group` with optional printer columns
pub fn report_crd(group: &str, plural: &str, scope: &str, columns: Option<Value>) -> CustomResourceDefinition {
    let mut version = json!({"name": "v1alpha1", "served": true, "storage": true});
    if let Some(columns) = columns {
        version["additionalPrinterColumns"] = columns;
    }
    serde_json::from_value(json!({
        "apiVersion": "apiextensions.k8s.io/v1",
        "kind": "CustomResourceDefinition",
        "metadata": {"name": format!("{}.{}", plural, group)},
        "spec": {
            "group": group,
            "names": {"kind": "Report", "plural": plural},
            "scope": scope,
            "versions": [version]
        }
    }))
    .expect("valid CRD fixture")
}

/// A namespaced report object
pub fn report_object(namespace: &str, name: &str, critical: u64) -> Value {
    json!({
        "apiVersion": "aquasecurity.github.io/v1alpha1",
        "kind": "Report",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "creationTimestamp": "2024-03-01T10:00:00Z"
        },
        "report": {"summary": {"criticalCount": critical}}
    })
}
