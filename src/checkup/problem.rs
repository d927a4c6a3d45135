//! Problem definitions and the detector contract.

use std::borrow::Cow;

use crate::checkup::detectors::{hpa, pod};
use crate::checkup::report::Severity;
use crate::config::Config;
use crate::resources::{Resource, ResourceKind};

/// Prefix of the help page used when a problem carries no explicit URL.
pub const DEFAULT_HELP_URL_BASE: &str = "https://github.com/getoutreach/devenv/wiki/";

/// A problem found on a single resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub detail: String,
    pub severity: Severity,
}

impl Detection {
    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            severity: Severity::Warning,
        }
    }
}

/// Detection logic, one variant per known problem.
///
/// Every detector reads the resource and the run [`Config`] only. Handing a
/// detector a resource of another kind yields `None`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detector {
    PodCrashLoopBackOff,
    PodNotReady,
    PodImagePullBackOff,
    PodOomKilled,
    PodPending,
    HighRestarts,
    MaxedOutHpas,
}

impl Detector {
    /// Kind of resource this detector inspects.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Detector::MaxedOutHpas => ResourceKind::HorizontalPodAutoscaler,
            _ => ResourceKind::Pod,
        }
    }

    /// Returns `Some` when the problem is currently present on `resource`.
    pub fn detect(&self, resource: &Resource, config: &Config) -> Option<Detection> {
        match self {
            Detector::PodCrashLoopBackOff => resource.as_pod().and_then(pod::crash_loop_back_off),
            Detector::PodNotReady => resource.as_pod().and_then(pod::not_ready),
            Detector::PodImagePullBackOff => resource.as_pod().and_then(pod::image_pull_back_off),
            Detector::PodOomKilled => resource.as_pod().and_then(pod::oom_killed),
            Detector::PodPending => resource.as_pod().and_then(pod::pending),
            Detector::HighRestarts => resource
                .as_pod()
                .and_then(|p| pod::high_restarts(p, config.restart_threshold)),
            Detector::MaxedOutHpas => resource.as_autoscaler().and_then(hpa::maxed_out),
        }
    }
}

/// A known problem pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Unique within a catalog; groups records for the same problem.
    pub id: &'static str,
    pub short_description: &'static str,
    pub help_url: Option<&'static str>,
    pub detector: Detector,
}

impl Problem {
    pub fn kind(&self) -> ResourceKind {
        self.detector.kind()
    }

    pub fn detect(&self, resource: &Resource, config: &Config) -> Option<Detection> {
        self.detector.detect(resource, config)
    }

    /// Explicit help URL, or the conventional wiki page for this id.
    pub fn help_url(&self) -> Cow<'static, str> {
        match self.help_url {
            Some(url) => Cow::Borrowed(url),
            None => Cow::Owned(format!("{DEFAULT_HELP_URL_BASE}{}", self.id)),
        }
    }
}

pub const POD_CRASH_LOOP_BACK_OFF: Problem = Problem {
    id: "PodCrashLoopBackOff",
    short_description: "A pod is in a crash loop backoff state, meaning it is crashing repeatedly",
    help_url: None,
    detector: Detector::PodCrashLoopBackOff,
};

pub const POD_NOT_READY: Problem = Problem {
    id: "PodNotReady",
    short_description: "A pod is not ready which can indicate a problem with the pod",
    help_url: None,
    detector: Detector::PodNotReady,
};

pub const POD_IMAGE_PULL_BACK_OFF: Problem = Problem {
    id: "PodImagePullBackOff",
    short_description: "A pod is in a image pull backoff state, meaning it is unable to pull the image",
    help_url: None,
    detector: Detector::PodImagePullBackOff,
};

pub const POD_OOM_KILLED: Problem = Problem {
    id: "PodOOMKilled",
    short_description: "A pod was killed because it ran out of memory recently",
    help_url: None,
    detector: Detector::PodOomKilled,
};

pub const POD_PENDING: Problem = Problem {
    id: "PodPending",
    short_description: "A pod is pending",
    help_url: None,
    detector: Detector::PodPending,
};

pub const HIGH_RESTARTS: Problem = Problem {
    id: "HighRestarts",
    short_description: "A pod keeps restarting which can indicate a problem",
    help_url: Some("https://github.com/Ashvin-Ranjan/k8r/wiki/HighRestarts"),
    detector: Detector::HighRestarts,
};

pub const MAXED_OUT_HPAS: Problem = Problem {
    id: "MaxedOutHPAs",
    short_description: "A pod's HPAs current replicas is equal to its max",
    help_url: Some("https://github.com/Ashvin-Ranjan/k8r/wiki/MaxedOutHPAs"),
    detector: Detector::MaxedOutHpas,
};
