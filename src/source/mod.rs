//! Resource snapshot acquisition.
//!
//! A [`SnapshotSource`] lists every pod and autoscaler in the cluster once.
//! The checkup itself never talks to the cluster.

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::resources::{HorizontalPodAutoscaler, Pod, Resource};

pub mod file;
pub mod kubectl;

pub use file::FileSource;
pub use kubectl::KubectlSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A point-in-time listing of the resources the checkup scans.
///
/// Listed objects are tagged once on construction and scanned in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    resources: Vec<Resource>,
}

impl Snapshot {
    pub fn new(pods: Vec<Pod>, autoscalers: Vec<HorizontalPodAutoscaler>) -> Self {
        let mut resources = Vec::with_capacity(pods.len() + autoscalers.len());
        resources.extend(pods.into_iter().map(Resource::from));
        resources.extend(autoscalers.into_iter().map(Resource::from));
        Self { resources }
    }

    /// All resources tagged by kind: pods, then autoscalers, each in listing order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn pods(&self) -> impl Iterator<Item = &Pod> + '_ {
        self.resources.iter().filter_map(Resource::as_pod)
    }

    pub fn autoscalers(&self) -> impl Iterator<Item = &HorizontalPodAutoscaler> + '_ {
        self.resources.iter().filter_map(Resource::as_autoscaler)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Something that can list cluster resources.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn list_pods(&self) -> Result<Vec<Pod>, SourceError>;

    async fn list_autoscalers(&self) -> Result<Vec<HorizontalPodAutoscaler>, SourceError>;
}

/// List pods, then autoscalers. Either failure is fatal; there is no retry.
pub async fn fetch_snapshot<S>(source: &S) -> Result<Snapshot>
where
    S: SnapshotSource + ?Sized,
{
    let pods = source.list_pods().await.context("failed to list pods")?;
    let autoscalers = source
        .list_autoscalers()
        .await
        .context("failed to list hpas")?;

    info!(
        pods = pods.len(),
        autoscalers = autoscalers.len(),
        "fetched resource snapshot"
    );
    Ok(Snapshot::new(pods, autoscalers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{ObjectMeta, ResourceKind};

    struct Fixed {
        fail_autoscalers: bool,
    }

    #[async_trait]
    impl SnapshotSource for Fixed {
        async fn list_pods(&self) -> Result<Vec<Pod>, SourceError> {
            Ok(vec![Pod {
                metadata: ObjectMeta::new("default", "a"),
                ..Default::default()
            }])
        }

        async fn list_autoscalers(&self) -> Result<Vec<HorizontalPodAutoscaler>, SourceError> {
            if self.fail_autoscalers {
                return Err(SourceError::Io {
                    path: "hpas.json".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                });
            }
            Ok(vec![HorizontalPodAutoscaler::default()])
        }
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let snapshot = fetch_snapshot(&Fixed { fail_autoscalers: false }).await.unwrap();
        assert_eq!(snapshot.len(), 2);

        let kinds: Vec<_> = snapshot.resources().iter().map(Resource::kind).collect();
        assert_eq!(kinds, vec![ResourceKind::Pod, ResourceKind::HorizontalPodAutoscaler]);
    }

    #[tokio::test]
    async fn test_fetch_failure_has_context() {
        let err = fetch_snapshot(&Fixed { fail_autoscalers: true }).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.starts_with("failed to list hpas"), "{msg}");
        assert!(msg.contains("hpas.json"));
    }

    #[test]
    fn test_snapshot_views_share_storage() {
        let snapshot = Snapshot::new(
            vec![Pod::default(), Pod::default()],
            vec![HorizontalPodAutoscaler::default()],
        );
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.pods().count(), 2);
        assert_eq!(snapshot.autoscalers().count(), 1);

        let first = snapshot.pods().next().unwrap();
        assert!(std::ptr::eq(first, snapshot.resources()[0].as_pod().unwrap()));
        assert!(std::ptr::eq(snapshot.resources(), snapshot.resources()));
    }
}
