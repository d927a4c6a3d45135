//! Autoscaler detectors.

use crate::checkup::problem::Detection;
use crate::resources::HorizontalPodAutoscaler;

/// An autoscaler is maxed out when it runs at its replica ceiling.
///
/// A zero ceiling only comes from an object without a spec and is ignored.
pub fn maxed_out(hpa: &HorizontalPodAutoscaler) -> Option<Detection> {
    let max = hpa.spec.max_replicas;
    let current = hpa.status.current_replicas;
    if max <= 0 || current != max {
        return None;
    }

    Some(Detection::error(format!(
        "{} has {}/{} replicas",
        hpa.metadata.name, current, max
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkup::report::Severity;
    use crate::resources::ObjectMeta;

    fn hpa(current: i32, max: i32) -> HorizontalPodAutoscaler {
        let mut hpa = HorizontalPodAutoscaler {
            metadata: ObjectMeta::new("shop", "web"),
            ..Default::default()
        };
        hpa.spec.max_replicas = max;
        hpa.status.current_replicas = current;
        hpa
    }

    #[test]
    fn test_maxed_out() {
        let found = maxed_out(&hpa(10, 10)).unwrap();
        assert_eq!(found.severity, Severity::Error);
        assert_eq!(found.detail, "web has 10/10 replicas");
    }

    #[test]
    fn test_below_max() {
        assert_eq!(maxed_out(&hpa(9, 10)), None);
    }

    #[test]
    fn test_missing_spec_ignored() {
        assert_eq!(maxed_out(&HorizontalPodAutoscaler::default()), None);
    }
}
