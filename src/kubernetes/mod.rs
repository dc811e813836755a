//! Kubernetes adapters
//!
//! - [`client`]: `kube`-backed implementation of the cluster API port
//! - [`identity`]: display name of the active cluster

pub mod client;
pub mod identity;

#[cfg(test)]
pub(crate) mod mock;

pub use client::KubeClusterApi;
pub use identity::{in_cluster, resolve_cluster_name, IN_CLUSTER_NAME};
