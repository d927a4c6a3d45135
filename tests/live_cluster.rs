use anyhow::{Context, Result};
use kubedoctor::checkup::{self, Catalog};
use kubedoctor::config::Config;
use kubedoctor::source::{self, KubectlSource};

// Live tests against whatever cluster the current kubeconfig context points at.
// Run with `cargo test --test live_cluster -- --ignored` on a machine with kubectl.

#[tokio::test]
#[ignore]
async fn test_live_snapshot_and_checkup() -> Result<()> {
    let source = KubectlSource::default();
    let snapshot = source::fetch_snapshot(&source)
        .await
        .context("kubectl listing failed")?;
    println!(
        " - Listed {} pods and {} autoscalers",
        snapshot.pods().count(),
        snapshot.autoscalers().count()
    );

    let report = checkup::check(&snapshot, &Catalog::builtin(), &Config::default());
    for group in report.by_problem() {
        println!(" - {}: {}", group.problem_id, group.records.len());
    }

    let referenced: std::collections::HashSet<_> =
        report.records().iter().map(|r| r.problem_id.as_str()).collect();
    assert_eq!(referenced.len(), report.problems().len());
    Ok(())
}
