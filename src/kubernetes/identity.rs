//! Cluster identity
//!
//! Determines the display name of the cluster this process talks to. The
//! name is resolved once at start-up and stamped on every report payload.

use crate::domain::model::UNKNOWN_CLUSTER;
use kube::config::Kubeconfig;
use tracing::{debug, warn};

/// Environment variables set by the kubelet inside every pod
pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
pub const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";

/// Name reported when running inside the cluster
pub const IN_CLUSTER_NAME: &str = "in-cluster";

/// Resolve the active cluster name from the process environment
///
/// Inside a pod this is [`IN_CLUSTER_NAME`]; otherwise the cluster of the
/// kubeconfig's current context. Falls back to [`UNKNOWN_CLUSTER`].
pub fn resolve_cluster_name() -> String {
    resolve_with(|name| std::env::var(name).ok(), || match Kubeconfig::read() {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(error = %e, "Failed to read kubeconfig");
            None
        }
    })
}

/// Whether the process environment marks execution inside a pod
///
/// The same decision selects the client configuration, so the stamped
/// name and the cluster actually queried always agree.
pub fn in_cluster() -> bool {
    is_in_cluster(&|name: &str| std::env::var(name).ok())
}

/// Resolve with injected environment and kubeconfig loader
pub fn resolve_with<E, K>(env: E, load_kubeconfig: K) -> String
where
    E: Fn(&str) -> Option<String>,
    K: FnOnce() -> Option<Kubeconfig>,
{
    if is_in_cluster(&env) {
        debug!("Using in-cluster configuration");
        return IN_CLUSTER_NAME.to_string();
    }

    load_kubeconfig()
        .and_then(|config| current_cluster(&config))
        .unwrap_or_else(|| UNKNOWN_CLUSTER.to_string())
}

/// Both service host and port must be present and non-empty
fn is_in_cluster<E: Fn(&str) -> Option<String>>(env: &E) -> bool {
    let present = |name: &str| env(name).is_some_and(|v: String| !v.is_empty());
    present(SERVICE_HOST_ENV) && present(SERVICE_PORT_ENV)
}

/// Cluster referenced by the current context
pub fn current_cluster(config: &Kubeconfig) -> Option<String> {
    let current = config.current_context.as_deref()?;
    config
        .contexts
        .iter()
        .find(|named| named.name == current)
        .and_then(|named| named.context.as_ref())
        .map(|ctx| ctx.cluster.clone())
        .filter(|cluster| !cluster.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: staging
clusters:
  - name: kind-dev
    cluster:
      server: https://127.0.0.1:6443
  - name: gke-staging
    cluster:
      server: https://10.0.0.1
contexts:
  - name: dev
    context:
      cluster: kind-dev
      user: admin
  - name: staging
    context:
      cluster: gke-staging
      user: admin
users:
  - name: admin
    user:
      token: abc
"#;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn kubeconfig() -> Kubeconfig {
        Kubeconfig::from_yaml(KUBECONFIG).unwrap()
    }

    #[test]
    fn test_in_cluster() {
        let name = resolve_with(
            env(&[(SERVICE_HOST_ENV, "10.96.0.1"), (SERVICE_PORT_ENV, "443")]),
            || panic!("kubeconfig must not be read in-cluster"),
        );
        assert_eq!(name, IN_CLUSTER_NAME);
    }

    #[test]
    fn test_in_cluster_matches_env_pair() {
        assert!(is_in_cluster(&env(&[(SERVICE_HOST_ENV, "10.96.0.1"), (SERVICE_PORT_ENV, "443")])));
        assert!(!is_in_cluster(&env(&[(SERVICE_HOST_ENV, "10.96.0.1")])));
        assert!(!is_in_cluster(&env(&[(SERVICE_HOST_ENV, ""), (SERVICE_PORT_ENV, "443")])));
    }

    #[test]
    fn test_host_without_port_uses_kubeconfig() {
        let name = resolve_with(env(&[(SERVICE_HOST_ENV, "10.96.0.1")]), || Some(kubeconfig()));
        assert_eq!(name, "gke-staging");
    }

    #[test]
    fn test_current_context_cluster() {
        assert_eq!(current_cluster(&kubeconfig()).as_deref(), Some("gke-staging"));
    }

    #[test]
    fn test_unknown_cluster() {
        assert_eq!(resolve_with(env(&[]), || None), UNKNOWN_CLUSTER);

        let mut config = kubeconfig();
        config.current_context = Some("missing".into());
        assert_eq!(resolve_with(env(&[]), || Some(config)), UNKNOWN_CLUSTER);

        let mut config = kubeconfig();
        config.current_context = None;
        assert_eq!(current_cluster(&config), None);
    }

    #[test]
    fn test_kubeconfig_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(KUBECONFIG.as_bytes()).unwrap();

        let config = Kubeconfig::read_from(file.path()).unwrap();
        assert_eq!(resolve_with(env(&[]), || Some(config)), "gke-staging");
    }
}
