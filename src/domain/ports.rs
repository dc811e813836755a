//! Domain Ports - Core trait definitions for the report cache
//!
//! These traits define the boundaries between the report services and the
//! external systems they depend on. Adapters implement these traits to
//! provide concrete functionality.

use crate::error::Result;
use async_trait::async_trait;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Cluster API Port
// =============================================================================

/// Remote calls the report services make against the cluster
///
/// Every call is fallible; custom objects are returned as raw JSON.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List every CRD in the cluster
    async fn list_crds(&self) -> Result<Vec<CustomResourceDefinition>>;

    /// Get one CRD by its full name (`<plural>.<group>`)
    async fn get_crd(&self, name: &str) -> Result<CustomResourceDefinition>;

    /// List the objects of a cluster-scoped kind
    async fn list_cluster_custom_objects(
        &self,
        group: &str,
        version: &str,
        plural: &str,
    ) -> Result<Vec<Value>>;

    /// List the objects of a namespaced kind across all namespaces
    async fn list_namespaced_custom_objects_all(
        &self,
        group: &str,
        version: &str,
        plural: &str,
    ) -> Result<Vec<Value>>;

    /// Get one namespaced object by name
    async fn get_namespaced_custom_object(
        &self,
        group: &str,
        version: &str,
        namespace: &str,
        plural: &str,
        name: &str,
    ) -> Result<Value>;
}

/// Type alias for Arc'd ClusterApi
pub type ClusterApiRef = Arc<dyn ClusterApi>;

// =============================================================================
// Cache Store Port
// =============================================================================

/// String-keyed store with per-key TTL
///
/// Values are opaque serialized text. Implementations must never return a
/// value whose TTL has elapsed.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend name for logs and metrics
    fn backend(&self) -> &'static str;

    /// Look up a key; `Ok(None)` is a miss
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, overwriting any existing one
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Delete a key
    ///
    /// Returns true if the key existed. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Check if the store is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Release the underlying connection
    async fn close(&self);
}

/// Type alias for Arc'd CacheStore
pub type CacheStoreRef = Arc<dyn CacheStore>;
