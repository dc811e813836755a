//! Error types for the Trivy report cache
//!
//! Provides structured error types for the cluster API adapter, the
//! report services and the cache stores.

use thiserror::Error;

/// Unified error type for the report cache
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Kubernetes Errors
    // =========================================================================
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Resource not found: {kind}/{name}")]
    ResourceNotFound { kind: String, name: String },

    #[error("CRD {crd} has no schema")]
    SchemaMissing { crd: String },

    #[error("CRD {crd} does not serve version {version}")]
    VersionNotFound { crd: String, version: String },

    // =========================================================================
    // Cache Errors
    // =========================================================================
    #[error("Cache store error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache store unavailable: {0}")]
    CacheUnavailable(String),

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error is transient
    ///
    /// Transient errors are expected to clear up on their own (network
    /// blips, a cache store that is restarting) and are logged at a lower
    /// severity than schema problems.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Kube(_) | Error::Redis(_) | Error::CacheUnavailable(_)
        )
    }

    /// Check if this error means the requested object does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::ResourceNotFound { .. } => true,
            Error::Kube(kube::Error::Api(resp)) => resp.code == 404,
            _ => false,
        }
    }
}

/// Result type alias for the report cache
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_transient() {
        let err = Error::CacheUnavailable("connection refused".into());
        assert!(err.is_transient());

        let err = Error::VersionNotFound {
            crd: "vulnerabilityreports.aquasecurity.github.io".into(),
            version: "v1alpha1".into(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn test_error_not_found() {
        let err = Error::ResourceNotFound {
            kind: "CustomResourceDefinition".into(),
            name: "vulnerabilityreports.aquasecurity.github.io".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Resource not found: CustomResourceDefinition/vulnerabilityreports.aquasecurity.github.io"
        );

        let api = Error::Kube(kube::Error::Api(kube::error::ErrorResponse {
            status: "Failure".into(),
            message: "not found".into(),
            reason: "NotFound".into(),
            code: 404,
        }));
        assert!(api.is_not_found());
        assert!(!Error::Internal("boom".into()).is_not_found());
    }
}
