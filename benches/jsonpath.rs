//! Benchmark for report projection
//!
//! Target: a 1K-object report projects well under the cluster list latency

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::{json, Value};
use trivy_report_cache::reports::columns::project_record;
use trivy_report_cache::reports::jsonpath::{extract, extract_in};
use trivy_report_cache::ColumnDefinition;

fn vulnerability_report(i: usize) -> Value {
    json!({
        "apiVersion": "aquasecurity.github.io/v1alpha1",
        "kind": "VulnerabilityReport",
        "metadata": {
            "name": format!("replicaset-app-{}", i),
            "namespace": "default",
            "creationTimestamp": "2024-03-01T10:00:00Z"
        },
        "report": {
            "artifact": {"repository": "library/nginx", "tag": "1.25"},
            "scanner": {"name": "Trivy", "version": "0.50.0"},
            "summary": {"criticalCount": i % 5, "highCount": i % 11, "mediumCount": 3}
        }
    })
}

fn columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("Repository", ".report.artifact.repository", "string"),
        ColumnDefinition::new("Tag", ".report.artifact.tag", "string"),
        ColumnDefinition::new("Scanner", ".report.scanner.name", "string"),
        ColumnDefinition::new("Age", ".metadata.creationTimestamp", "date"),
        ColumnDefinition::new("Critical", ".report.summary.criticalCount", "integer"),
        ColumnDefinition::new("High", ".report.summary.highCount", "integer"),
        ColumnDefinition::new("Missing", ".report.summary.unknown.count", "integer"),
    ]
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("jsonpath");
    group.throughput(Throughput::Elements(1));
    let record = vulnerability_report(1);

    group.bench_function("extract_nested", |b| {
        b.iter(|| extract(black_box(&record), black_box(".report.summary.criticalCount")));
    });

    group.bench_function("extract_missing", |b| {
        b.iter(|| extract(black_box(&record), black_box(".report.summary.unknown.count")));
    });

    group.bench_function("extract_timestamp", |b| {
        b.iter(|| extract_in(black_box(&record), black_box(".metadata.creationTimestamp"), &Utc));
    });

    group.finish();
}

fn bench_project_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");
    let objects: Vec<Value> = (0..1000).map(vulnerability_report).collect();
    let columns = columns();
    group.throughput(Throughput::Elements(objects.len() as u64));

    group.bench_function("project_1000_records", |b| {
        b.iter(|| {
            objects
                .iter()
                .map(|object| project_record(black_box(object), &columns))
                .collect::<Vec<_>>()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_extract, bench_project_report);
criterion_main!(benches);
