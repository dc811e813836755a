//! Kubernetes Cluster API Adapter
//!
//! Implements the [`ClusterApi`] port with a `kube` client. Custom objects
//! are read through the dynamic API and handed back as raw JSON.

use crate::domain::ports::ClusterApi;
use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind, ListParams};
use kube::config::{Config, KubeConfigOptions};
use kube::{Api, Client};
use serde_json::Value;
use tracing::debug;

/// Cluster API backed by a `kube` client
///
/// The client is created once at start-up and shared; cloning it is cheap.
#[derive(Clone)]
pub struct KubeClusterApi {
    client: Client,
}

impl KubeClusterApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a client for the cluster the identity resolver names
    ///
    /// Service account configuration when `in_cluster`, the kubeconfig's
    /// current context otherwise. There is no fallback from one to the other.
    pub async fn connect(in_cluster: bool) -> Result<Self> {
        let config = if in_cluster {
            Config::incluster()
                .map_err(|e| Error::Configuration(format!("In-cluster configuration: {}", e)))?
        } else {
            Config::from_kubeconfig(&KubeConfigOptions::default())
                .await
                .map_err(|e| Error::Configuration(format!("Kubeconfig: {}", e)))?
        };
        debug!(cluster_url = %config.cluster_url, in_cluster, "Creating Kubernetes client");
        Ok(Self::new(Client::try_from(config)?))
    }

    fn crds(&self) -> Api<CustomResourceDefinition> {
        Api::all(self.client.clone())
    }

    fn dynamic_all(&self, group: &str, version: &str, plural: &str) -> Api<DynamicObject> {
        Api::all_with(self.client.clone(), &api_resource(group, version, plural))
    }

    async fn list_dynamic(&self, api: Api<DynamicObject>, plural: &str) -> Result<Vec<Value>> {
        let list = api.list(&ListParams::default()).await?;
        debug!(plural = %plural, count = list.items.len(), "Listed custom objects");
        list.items
            .into_iter()
            .map(|obj| serde_json::to_value(obj).map_err(Into::into))
            .collect()
    }
}

/// Resource descriptor for a custom kind known only by plural
///
/// The kind is left empty: list and get URLs only need the plural.
fn api_resource(group: &str, version: &str, plural: &str) -> ApiResource {
    ApiResource::from_gvk_with_plural(&GroupVersionKind::gvk(group, version, ""), plural)
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    async fn list_crds(&self) -> Result<Vec<CustomResourceDefinition>> {
        let list = self.crds().list(&ListParams::default()).await?;
        Ok(list.items)
    }

    async fn get_crd(&self, name: &str) -> Result<CustomResourceDefinition> {
        Ok(self.crds().get(name).await?)
    }

    async fn list_cluster_custom_objects(
        &self,
        group: &str,
        version: &str,
        plural: &str,
    ) -> Result<Vec<Value>> {
        self.list_dynamic(self.dynamic_all(group, version, plural), plural)
            .await
    }

    async fn list_namespaced_custom_objects_all(
        &self,
        group: &str,
        version: &str,
        plural: &str,
    ) -> Result<Vec<Value>> {
        // An unscoped Api over a namespaced kind lists across all namespaces
        self.list_dynamic(self.dynamic_all(group, version, plural), plural)
            .await
    }

    async fn get_namespaced_custom_object(
        &self,
        group: &str,
        version: &str,
        namespace: &str,
        plural: &str,
        name: &str,
    ) -> Result<Value> {
        let api: Api<DynamicObject> = Api::namespaced_with(
            self.client.clone(),
            namespace,
            &api_resource(group, version, plural),
        );
        let obj = api.get(name).await?;
        Ok(serde_json::to_value(obj)?)
    }
}
