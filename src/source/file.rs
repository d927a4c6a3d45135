//! Offline snapshots read from `kubectl get -o json` output saved to disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{SnapshotSource, SourceError};
use crate::resources::{HorizontalPodAutoscaler, ObjectList, Pod};

#[derive(Debug, Clone)]
pub struct FileSource {
    pods: PathBuf,
    autoscalers: PathBuf,
}

impl FileSource {
    pub fn new(pods: impl Into<PathBuf>, autoscalers: impl Into<PathBuf>) -> Self {
        Self {
            pods: pods.into(),
            autoscalers: autoscalers.into(),
        }
    }

    async fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SourceError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let list: ObjectList<T> =
            serde_json::from_str(&content).map_err(|source| SourceError::Parse {
                what: path.display().to_string(),
                source,
            })?;
        debug!(path = %path.display(), kind = %list.kind, items = list.items.len(), "read list");
        Ok(list.items)
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn list_pods(&self) -> Result<Vec<Pod>, SourceError> {
        Self::read_list(&self.pods).await
    }

    async fn list_autoscalers(&self) -> Result<Vec<HorizontalPodAutoscaler>, SourceError> {
        Self::read_list(&self.autoscalers).await
    }
}
