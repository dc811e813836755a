//! Column projection
//!
//! Turns a CRD's additional printer columns into [`ColumnDefinition`]s and
//! projects raw custom objects into flat report records.

use crate::domain::model::ColumnDefinition;
use crate::reports::jsonpath;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceColumnDefinition, CustomResourceDefinition, CustomResourceDefinitionVersion,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Find the served schema version named `version`
pub fn find_version<'a>(
    crd: &'a CustomResourceDefinition,
    version: &str,
) -> Option<&'a CustomResourceDefinitionVersion> {
    crd.spec.versions.iter().find(|v| v.name == version)
}

/// Derive column definitions from one schema version
///
/// Returns an empty list when the version is absent or declares no
/// printer columns.
pub fn project_columns(version: Option<&CustomResourceDefinitionVersion>) -> Vec<ColumnDefinition> {
    let Some(version) = version else {
        debug!("No schema version to project columns from");
        return Vec::new();
    };

    match version.additional_printer_columns.as_deref() {
        Some(columns) if !columns.is_empty() => columns.iter().map(to_column).collect(),
        _ => {
            debug!(version = %version.name, "Schema version declares no printer columns");
            Vec::new()
        }
    }
}

/// Columns for report loading: declared columns, or name and age
pub fn columns_or_default(version: Option<&CustomResourceDefinitionVersion>) -> Vec<ColumnDefinition> {
    let columns = project_columns(version);
    if columns.is_empty() {
        ColumnDefinition::defaults()
    } else {
        columns
    }
}

fn to_column(col: &CustomResourceColumnDefinition) -> ColumnDefinition {
    ColumnDefinition {
        name: col.name.clone(),
        description: col.description.clone(),
        json_path: normalize_path(&col.json_path),
        type_: col.type_.clone(),
        priority: col.priority,
    }
}

/// Ensure the path starts with the root marker
fn normalize_path(path: &str) -> String {
    if path.starts_with('.') {
        path.to_string()
    } else {
        format!(".{}", path)
    }
}

/// Project one custom object through `columns`
///
/// The record keeps the object's `metadata` and adds one key per column,
/// `null` where the path resolves to nothing. A later column with a
/// duplicate name overwrites the earlier value.
pub fn project_record(object: &Value, columns: &[ColumnDefinition]) -> Value {
    let mut record = Map::new();
    if let Some(metadata) = object.get("metadata") {
        record.insert("metadata".to_string(), metadata.clone());
    }
    for column in columns {
        let value = jsonpath::extract(object, &column.json_path).unwrap_or(Value::Null);
        record.insert(column.name.clone(), value);
    }
    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn crd(versions: Value) -> CustomResourceDefinition {
        serde_json::from_value(json!({
            "apiVersion": "apiextensions.k8s.io/v1",
            "kind": "CustomResourceDefinition",
            "metadata": {"name": "configauditreports.aquasecurity.github.io"},
            "spec": {
                "group": "aquasecurity.github.io",
                "names": {"kind": "ConfigAuditReport", "plural": "configauditreports"},
                "scope": "Namespaced",
                "versions": versions
            }
        }))
        .unwrap()
    }

    fn audit_crd() -> CustomResourceDefinition {
        crd(json!([{
            "name": "v1alpha1",
            "served": true,
            "storage": true,
            "additionalPrinterColumns": [
                {"name": "Scanner", "type": "string", "jsonPath": ".report.scanner.name", "description": "The name of the config audit scanner"},
                {"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"},
                {"name": "Critical", "type": "integer", "jsonPath": ".report.summary.criticalCount", "priority": 1},
                {"name": "Low", "type": "integer", "jsonPath": "report.summary.lowCount", "priority": 1}
            ]
        }]))
    }

    #[test]
    fn test_project_declared_columns() {
        let audit = audit_crd();
        let columns = project_columns(find_version(&audit, "v1alpha1"));

        assert_eq!(columns.len(), 4);
        assert_eq!(columns[0].name, "Scanner");
        assert_eq!(columns[0].description.as_deref(), Some("The name of the config audit scanner"));
        assert_eq!(columns[2].priority, Some(1));
        assert_eq!(columns[2].type_, "integer");
        assert_eq!(columns[3].json_path, ".report.summary.lowCount");
    }

    #[test]
    fn test_missing_version_or_columns() {
        let audit = audit_crd();
        assert!(find_version(&audit, "v1").is_none());
        assert!(project_columns(find_version(&audit, "v1")).is_empty());

        let bare = crd(json!([{"name": "v1alpha1", "served": true, "storage": true}]));
        assert!(project_columns(find_version(&bare, "v1alpha1")).is_empty());

        let empty = crd(json!([{"name": "v1alpha1", "served": true, "storage": true, "additionalPrinterColumns": []}]));
        assert!(project_columns(find_version(&empty, "v1alpha1")).is_empty());
    }

    #[test]
    fn test_default_columns_fallback() {
        let bare = crd(json!([{"name": "v1alpha1", "served": true, "storage": true}]));
        let columns = columns_or_default(find_version(&bare, "v1alpha1"));
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Age"]);
        assert_eq!(columns[1].type_, "date");

        let declared = audit_crd();
        assert_eq!(columns_or_default(find_version(&declared, "v1alpha1")).len(), 4);
    }

    #[test]
    fn test_project_record() {
        let object = json!({
            "apiVersion": "aquasecurity.github.io/v1alpha1",
            "kind": "ConfigAuditReport",
            "metadata": {"name": "pod-nginx", "namespace": "web"},
            "report": {"scanner": {"name": "Trivy"}, "summary": {"criticalCount": 3}}
        });
        let columns = vec![
            ColumnDefinition::new("Scanner", ".report.scanner.name", "string"),
            ColumnDefinition::new("Critical", ".report.summary.criticalCount", "integer"),
            ColumnDefinition::new("High", ".report.summary.highCount", "integer"),
        ];

        let record = project_record(&object, &columns);
        assert_eq!(
            record,
            json!({
                "metadata": {"name": "pod-nginx", "namespace": "web"},
                "Scanner": "Trivy",
                "Critical": 3,
                "High": null
            })
        );
        // Column order follows the schema
        let keys: Vec<_> = record.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["metadata", "Scanner", "Critical", "High"]);
    }

    #[test]
    fn test_duplicate_column_names() {
        let object = json!({"metadata": {"name": "a"}, "spec": {"x": 1, "y": 2}});
        let columns = vec![
            ColumnDefinition::new("Value", ".spec.x", "integer"),
            ColumnDefinition::new("Value", ".spec.y", "integer"),
        ];
        let record = project_record(&object, &columns);
        assert_eq!(record["Value"], json!(2));
        assert_eq!(record.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_object_without_metadata() {
        let record = project_record(&json!({"spec": {}}), &ColumnDefinition::defaults());
        assert_eq!(record, json!({"Name": null, "Age": null}));
    }
}
