//! Typed cluster resources the checkup understands.
//!
//! Only the fields the detectors read are modelled; everything else in the
//! object is ignored. Every field is optional or defaulted so that partial
//! objects from `kubectl get -o json` always parse.

use std::collections::BTreeMap;

use serde::Deserialize;

pub mod hpa;
pub mod pod;

pub use hpa::{HorizontalPodAutoscaler, HpaSpec, HpaStatus};
pub use pod::{
    Container, ContainerState, ContainerStatus, Pod, PodPhase, PodSpec, PodStatus,
    StateTerminated, StateWaiting,
};

/// Label carrying the owning team of a resource.
pub const OWNER_LABEL: &str = "reporting_team";

/// The closed set of resource kinds scanned by the checkup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Pod,
    HorizontalPodAutoscaler,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Pod, ResourceKind::HorizontalPodAutoscaler];

    /// Type string stamped on every record produced for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pod => "pod",
            ResourceKind::HorizontalPodAutoscaler => "HPA",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Standard object metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels: BTreeMap::new(),
        }
    }

    /// `<namespace>/<name>`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Owning team, empty when the label is missing.
    pub fn owner(&self) -> &str {
        self.labels.get(OWNER_LABEL).map(String::as_str).unwrap_or_default()
    }
}

/// The `{"kind": "PodList", "items": [...]}` envelope returned by list calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectList<T> {
    #[serde(default)]
    pub kind: String,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// A single resource tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Pod(Pod),
    HorizontalPodAutoscaler(HorizontalPodAutoscaler),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Pod(_) => ResourceKind::Pod,
            Resource::HorizontalPodAutoscaler(_) => ResourceKind::HorizontalPodAutoscaler,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Resource::Pod(pod) => &pod.metadata,
            Resource::HorizontalPodAutoscaler(hpa) => &hpa.metadata,
        }
    }

    pub fn qualified_name(&self) -> String {
        self.metadata().qualified_name()
    }

    pub fn owner(&self) -> &str {
        self.metadata().owner()
    }

    pub fn as_pod(&self) -> Option<&Pod> {
        match self {
            Resource::Pod(pod) => Some(pod),
            _ => None,
        }
    }

    pub fn as_autoscaler(&self) -> Option<&HorizontalPodAutoscaler> {
        match self {
            Resource::HorizontalPodAutoscaler(hpa) => Some(hpa),
            _ => None,
        }
    }
}

impl From<Pod> for Resource {
    fn from(pod: Pod) -> Self {
        Resource::Pod(pod)
    }
}

impl From<HorizontalPodAutoscaler> for Resource {
    fn from(hpa: HorizontalPodAutoscaler) -> Self {
        Resource::HorizontalPodAutoscaler(hpa)
    }
}
