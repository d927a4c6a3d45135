//! Pod wire model (`core/v1`).

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::ObjectMeta;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Pod {
    pub metadata: ObjectMeta,
    pub spec: PodSpec,
    pub status: PodStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodSpec {
    pub containers: Vec<Container>,
    pub init_containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Container {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodStatus {
    pub phase: PodPhase,
    pub container_statuses: Vec<ContainerStatus>,
    pub init_container_statuses: Vec<ContainerStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerStatus {
    pub name: String,
    pub ready: bool,
    pub restart_count: u32,
    pub state: ContainerState,
    /// Serialized as `lastState` by the API server.
    #[serde(rename = "lastState")]
    pub last_termination_state: ContainerState,
}

/// At most one state is set; a running container has neither member.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContainerState {
    pub waiting: Option<StateWaiting>,
    pub terminated: Option<StateTerminated>,
}

impl ContainerState {
    pub fn waiting_reason(&self) -> Option<&str> {
        self.waiting.as_ref().map(|w| w.reason.as_str())
    }

    pub fn terminated_reason(&self) -> Option<&str> {
        self.terminated.as_ref().map(|t| t.reason.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StateWaiting {
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateTerminated {
    pub reason: String,
    pub message: String,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Pod {
    /// Spec entry backing a status, searched in the init list for init statuses.
    pub fn container_spec(&self, name: &str, init: bool) -> Option<&Container> {
        let containers = if init {
            &self.spec.init_containers
        } else {
            &self.spec.containers
        };
        containers.iter().find(|c| c.name == name)
    }
}
