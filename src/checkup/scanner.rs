//! Runs the catalog over resource snapshots.

use tracing::{debug, info};

use crate::checkup::catalog::Catalog;
use crate::checkup::report::{ResourceRecord, Severity};
use crate::config::Config;
use crate::resources::{Resource, ResourceKind};
use crate::source::Snapshot;

/// Scan resources of one kind with the problems registered for that kind.
///
/// Resources tagged with another kind are skipped. A resource yields one record
/// per problem it exhibits.
pub fn scan<'r>(
    kind: ResourceKind,
    resources: impl IntoIterator<Item = &'r Resource>,
    catalog: &Catalog,
    config: &Config,
) -> Vec<ResourceRecord> {
    let mut records = Vec::new();
    let mut scanned = 0usize;

    for resource in resources {
        if resource.kind() != kind {
            continue;
        }
        scanned += 1;

        // Prefilled per resource, cloned for every problem found on it.
        let template = ResourceRecord {
            resource_name: resource.qualified_name(),
            owner: resource.owner().to_string(),
            resource_type: kind.as_str().to_string(),
            problem_id: String::new(),
            detail: String::new(),
            is_warning: false,
        };

        for problem in catalog.for_kind(kind) {
            let Some(detection) = problem.detect(resource, config) else {
                continue;
            };
            debug!(
                resource = %template.resource_name,
                problem = problem.id,
                severity = %detection.severity,
                "problem detected"
            );

            records.push(ResourceRecord {
                problem_id: problem.id.to_string(),
                detail: detection.detail,
                is_warning: detection.severity == Severity::Warning,
                ..template.clone()
            });
        }
    }

    info!(%kind, scanned, found = records.len(), "scanned resources");
    records
}

/// Scan a full snapshot: pods first, then autoscalers.
pub fn scan_snapshot(snapshot: &Snapshot, catalog: &Catalog, config: &Config) -> Vec<ResourceRecord> {
    ResourceKind::ALL
        .into_iter()
        .flat_map(|kind| scan(kind, snapshot.resources(), catalog, config))
        .collect()
}
