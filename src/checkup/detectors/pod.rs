//! Pod detectors.
//!
//! Each detector reports the first matching container only, regular containers
//! before init containers.

use crate::checkup::problem::Detection;
use crate::resources::{ContainerStatus, Pod, PodPhase};

/// Image reported when a status has no matching spec entry.
pub const UNKNOWN_IMAGE: &str = "unknown";

/// Container statuses in report order, each flagged with whether it is an init
/// container.
fn statuses(pod: &Pod) -> impl Iterator<Item = (bool, &ContainerStatus)> {
    let regular = pod.status.container_statuses.iter().map(|cs| (false, cs));
    let init = pod.status.init_container_statuses.iter().map(|cs| (true, cs));
    regular.chain(init)
}

fn label(init: bool) -> &'static str {
    if init {
        "Init container"
    } else {
        "Container"
    }
}

pub fn crash_loop_back_off(pod: &Pod) -> Option<Detection> {
    let (init, cs) =
        statuses(pod).find(|(_, cs)| cs.state.waiting_reason() == Some("CrashLoopBackOff"))?;

    let message = cs
        .last_termination_state
        .terminated
        .as_ref()
        .map(|t| t.message.trim())
        .filter(|m| !m.is_empty());

    let detail = match message {
        Some(message) => format!(
            "{} {} in a crash loop backoff state: {}",
            label(init),
            cs.name,
            message
        ),
        None => format!("{} {} in a crash loop backoff state", label(init), cs.name),
    };
    Some(Detection::error(detail))
}

pub fn not_ready(pod: &Pod) -> Option<Detection> {
    // Pods that finished or never started have their own problems.
    if pod.status.phase != PodPhase::Running {
        return None;
    }

    let cs = pod.status.container_statuses.iter().find(|cs| !cs.ready)?;
    Some(Detection::error(format!("Container {} is not ready", cs.name)))
}

pub fn image_pull_back_off(pod: &Pod) -> Option<Detection> {
    // ErrImagePull is the live failure, ImagePullBackOff the retry wait.
    let (init, cs) = statuses(pod).find(|(_, cs)| {
        matches!(
            cs.state.waiting_reason(),
            Some("ImagePullBackOff") | Some("ErrImagePull")
        )
    })?;

    let image = pod
        .container_spec(&cs.name, init)
        .map(|c| c.image.as_str())
        .unwrap_or(UNKNOWN_IMAGE);

    Some(Detection::error(format!(
        "Container {} is failing to pull its image ({})",
        cs.name, image
    )))
}

pub fn oom_killed(pod: &Pod) -> Option<Detection> {
    for cs in &pod.status.container_statuses {
        if cs.state.terminated_reason() == Some("OOMKilled") {
            return Some(Detection::error(format!(
                "Container {} was killed because it ran out of memory",
                cs.name
            )));
        }

        if let Some(last) = cs
            .last_termination_state
            .terminated
            .as_ref()
            .filter(|t| t.reason == "OOMKilled")
        {
            let finished = last
                .finished_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown time".to_string());
            return Some(Detection::warning(format!(
                "Container {} was recently killed because it ran out of memory: {}",
                cs.name, finished
            )));
        }
    }
    None
}

pub fn pending(pod: &Pod) -> Option<Detection> {
    if pod.status.phase != PodPhase::Pending {
        return None;
    }

    statuses(pod).find_map(|(init, cs)| {
        cs.state.waiting.as_ref().map(|waiting| {
            Detection::error(format!(
                "{} {} is pending: {}",
                label(init),
                cs.name,
                waiting.message
            ))
        })
    })
}

/// No phase check: a crash-looping pod can sit outside `Running` for long
/// stretches.
pub fn high_restarts(pod: &Pod, threshold: u32) -> Option<Detection> {
    let cs = pod
        .status
        .container_statuses
        .iter()
        .find(|cs| cs.restart_count >= threshold)?;

    Some(Detection::error(format!(
        "Container {} of pod {} has restarted {} time(s)",
        cs.name, pod.metadata.name, cs.restart_count
    )))
}
