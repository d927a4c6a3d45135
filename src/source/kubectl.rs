//! Live snapshots listed through the `kubectl` binary in JSON mode.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::process::Command;
use tracing::{debug, info};

use super::{SnapshotSource, SourceError};
use crate::resources::{HorizontalPodAutoscaler, ObjectList, Pod};

#[derive(Debug, Clone)]
pub struct KubectlSource {
    program: PathBuf,
    context: Option<String>,
}

impl Default for KubectlSource {
    fn default() -> Self {
        Self::new("kubectl", None)
    }
}

impl KubectlSource {
    pub fn new(program: impl Into<PathBuf>, context: Option<String>) -> Self {
        Self {
            program: program.into(),
            context,
        }
    }

    /// Arguments for `kubectl get <resource>` across all namespaces.
    pub fn list_args(&self, resource: &str) -> Vec<String> {
        let mut args = vec![
            "get".to_string(),
            resource.to_string(),
            "--all-namespaces".to_string(),
            "--output=json".to_string(),
        ];
        if let Some(context) = &self.context {
            args.push(format!("--context={context}"));
        }
        args
    }

    async fn list<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, SourceError> {
        let program = self.program.display().to_string();
        let args = self.list_args(resource);
        debug!(%program, ?args, "listing resources");

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| SourceError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let list: ObjectList<T> =
            serde_json::from_slice(&output.stdout).map_err(|source| SourceError::Parse {
                what: format!("`{program} get {resource}` output"),
                source,
            })?;
        info!(resource, items = list.items.len(), "listed resources");
        Ok(list.items)
    }
}

#[async_trait]
impl SnapshotSource for KubectlSource {
    async fn list_pods(&self) -> Result<Vec<Pod>, SourceError> {
        self.list("pods").await
    }

    async fn list_autoscalers(&self) -> Result<Vec<HorizontalPodAutoscaler>, SourceError> {
        self.list("horizontalpodautoscalers").await
    }
}
