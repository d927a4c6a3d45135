//! Cluster checkup: evaluates a resource snapshot against the problem catalog
//! and aggregates the findings into a [`Report`].

pub mod catalog;
pub mod detectors;
pub mod problem;
pub mod report;
pub mod scanner;

pub use catalog::{Catalog, CatalogError};
pub use problem::{Detection, Detector, Problem};
pub use report::{Outcome, ProblemGroup, Report, ResourceRecord, Severity, SeverityIndex};

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::source::{self, Snapshot, SnapshotSource};

/// Scan an already fetched snapshot.
pub fn check(snapshot: &Snapshot, catalog: &Catalog, config: &Config) -> Report {
    let records = scanner::scan_snapshot(snapshot, catalog, config);
    let report = Report::build(records, catalog);
    info!(
        records = report.records().len(),
        problems = report.problems().len(),
        "checkup complete"
    );
    report
}

/// Fetch a snapshot from `source` and scan it. Listing failures abort the run
/// before anything is scanned.
pub async fn run<S>(source: &S, catalog: &Catalog, config: &Config) -> Result<Report>
where
    S: SnapshotSource + ?Sized,
{
    let snapshot = source::fetch_snapshot(source).await?;
    Ok(check(&snapshot, catalog, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{HorizontalPodAutoscaler, ObjectMeta, Pod};
    use crate::source::SourceError;
    use async_trait::async_trait;

    struct Static(Snapshot);

    #[async_trait]
    impl SnapshotSource for Static {
        async fn list_pods(&self) -> Result<Vec<Pod>, SourceError> {
            Ok(self.0.pods().cloned().collect())
        }

        async fn list_autoscalers(&self) -> Result<Vec<HorizontalPodAutoscaler>, SourceError> {
            Ok(self.0.autoscalers().cloned().collect())
        }
    }

    #[test]
    fn test_run_empty_cluster_is_clean() {
        let source = Static(Snapshot::default());
        let report =
            tokio_test::block_on(run(&source, &Catalog::builtin(), &Config::default())).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.outcome(), Outcome::Clean);
    }

    #[test]
    fn test_maxed_out_autoscaler_scenario() {
        let mut hpa = HorizontalPodAutoscaler {
            metadata: ObjectMeta::new("shop", "web"),
            ..Default::default()
        };
        hpa.spec.max_replicas = 10;
        hpa.status.current_replicas = 10;
        let snapshot = Snapshot::new(Vec::new(), vec![hpa.clone()]);

        let report = check(&snapshot, &Catalog::builtin(), &Config::default());
        assert_eq!(report.records().len(), 1);
        let record = &report.records()[0];
        assert_eq!(record.problem_id, "MaxedOutHPAs");
        assert_eq!(record.severity(), Severity::Error);
        assert_eq!(report.outcome(), Outcome::ProblemsFound);

        hpa.status.current_replicas = 9;
        let snapshot = Snapshot::new(Vec::new(), vec![hpa]);
        let report = check(&snapshot, &Catalog::builtin(), &Config::default());
        assert!(report.is_clean());
    }
}
