//! Report data model
//!
//! Plain structured data handed to the presentation layer. Field names are
//! serialized in camelCase so cached payloads and HTTP responses share one
//! shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Display name used when the active cluster cannot be determined
pub const UNKNOWN_CLUSTER: &str = "Unknown Cluster";

// =============================================================================
// Column Definition
// =============================================================================

/// A named projection rule for one table column
///
/// Derived from a CRD's additional printer columns. Names are not unique;
/// a schema may declare the same name twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Dot-delimited path with a leading root marker (e.g. `.metadata.name`)
    pub json_path: String,
    /// Type hint only, never enforced
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl ColumnDefinition {
    /// Create a column without description or priority
    pub fn new(name: impl Into<String>, json_path: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            json_path: json_path.into(),
            type_: type_.into(),
            priority: None,
        }
    }

    /// Identity and age columns used when a CRD declares no printer columns
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Name", ".metadata.name", "string"),
            Self::new("Age", ".metadata.creationTimestamp", "date"),
        ]
    }
}

// =============================================================================
// Scopes
// =============================================================================

/// Where the instances of a CRD live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CrdScope {
    #[default]
    Cluster,
    Namespaced,
}

impl CrdScope {
    /// Parse the `spec.scope` string of a CRD
    ///
    /// Anything other than `Namespaced`, including an empty value, is
    /// treated as cluster-scoped.
    pub fn from_spec(scope: &str) -> Self {
        if scope == "Namespaced" {
            CrdScope::Namespaced
        } else {
            CrdScope::Cluster
        }
    }

    pub fn is_namespaced(&self) -> bool {
        matches!(self, CrdScope::Namespaced)
    }
}

impl fmt::Display for CrdScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrdScope::Cluster => write!(f, "Cluster"),
            CrdScope::Namespaced => write!(f, "Namespaced"),
        }
    }
}

/// Scope stamped on a report payload
///
/// `Unknown` only appears on error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportScope {
    Cluster,
    Namespaced,
    Unknown,
}

impl From<CrdScope> for ReportScope {
    fn from(scope: CrdScope) -> Self {
        match scope {
            CrdScope::Cluster => ReportScope::Cluster,
            CrdScope::Namespaced => ReportScope::Namespaced,
        }
    }
}

impl fmt::Display for ReportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportScope::Cluster => write!(f, "Cluster"),
            ReportScope::Namespaced => write!(f, "Namespaced"),
            ReportScope::Unknown => write!(f, "Unknown"),
        }
    }
}

// =============================================================================
// CRD Metadata
// =============================================================================

/// One discovered report CRD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdMetadata {
    pub group: String,
    pub plural: String,
    pub columns: Vec<ColumnDefinition>,
    pub scope: CrdScope,
}

// =============================================================================
// Reports Data
// =============================================================================

/// Outcome of loading the instances of one CRD
///
/// Either fully populated or an error placeholder with no manifests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsData {
    /// Projected report records, one per custom object
    pub manifests: Vec<Value>,
    pub cluster_name: String,
    pub scope: ReportScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportsData {
    /// Successful payload
    pub fn loaded(
        plural: impl Into<String>,
        cluster_name: impl Into<String>,
        scope: CrdScope,
        manifests: Vec<Value>,
    ) -> Self {
        Self {
            manifests,
            cluster_name: cluster_name.into(),
            scope: scope.into(),
            resource: Some(plural.into()),
            error: None,
        }
    }

    /// Error placeholder
    pub fn failed(plural: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            manifests: Vec::new(),
            cluster_name: UNKNOWN_CLUSTER.to_string(),
            scope: ReportScope::Unknown,
            resource: Some(plural.into()),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// A value produced with zero or more degradations along the way
///
/// Used for steps that must not fail outright: the value is always usable
/// and every fallback taken is recorded as a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> Outcome<T> {
    /// Value obtained without any fallback
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Value obtained through a fallback
    pub fn degraded(value: T, warning: impl Into<String>) -> Self {
        Self {
            value,
            warnings: vec![warning.into()],
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
