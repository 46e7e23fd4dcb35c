//! Client-side predicates applied after normalization.
//!
//! Every filter borrows its input and returns a new sequence, keeping the
//! relative order of what it keeps.

use super::events::EventSummary;
use super::network::IngressSummary;
use super::pods::RestartingPod;
use crate::k8s::request::EventType;

/// Keep events whose involved object name contains `name` and whose type
/// equals `event_type`, then put the most recent first.
///
/// Input is expected in the backend's ascending `lastTimestamp` order.
pub fn events(
    events: &[EventSummary],
    name: Option<&str>,
    event_type: Option<EventType>,
) -> Vec<EventSummary> {
    let mut kept: Vec<EventSummary> = events
        .iter()
        .filter(|e| {
            name.is_none_or(|needle| {
                e.object
                    .name
                    .as_deref()
                    .is_some_and(|n| n.contains(needle))
            })
        })
        .filter(|e| event_type.is_none_or(|t| e.type_.as_deref() == Some(t.as_str())))
        .cloned()
        .collect();
    kept.reverse();
    kept
}

/// Keep ingresses with at least one rule for `host`
pub fn ingresses_for_host(ingresses: &[IngressSummary], host: Option<&str>) -> Vec<IngressSummary> {
    ingresses
        .iter()
        .filter(|i| host.is_none_or(|h| i.serves_host(h)))
        .cloned()
        .collect()
}

/// Keep pods whose restart total strictly exceeds `threshold`
pub fn restarting_above(pods: &[RestartingPod], threshold: i64) -> Vec<RestartingPod> {
    pods.iter()
        .filter(|p| p.total_restarts > threshold)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::events::InvolvedObject;

    fn event(name: &str, type_: &str, reason: &str) -> EventSummary {
        EventSummary {
            type_: Some(type_.to_string()),
            reason: Some(reason.to_string()),
            message: None,
            object: InvolvedObject {
                kind: Some("Pod".to_string()),
                name: Some(name.to_string()),
            },
            count: 1,
            first_time: None,
            last_time: None,
        }
    }

    fn reasons(events: &[EventSummary]) -> Vec<&str> {
        events.iter().filter_map(|e| e.reason.as_deref()).collect()
    }

    fn restarting(name: &str, total: i64) -> RestartingPod {
        RestartingPod {
            name: name.to_string(),
            namespace: "shop".to_string(),
            total_restarts: total,
            container_statuses: Vec::new(),
        }
    }

    #[test]
    fn test_events_most_recent_first() {
        let input = [
            event("web-1", "Normal", "T1"),
            event("web-1", "Normal", "T2"),
            event("web-1", "Warning", "T3"),
        ];
        let out = events(&input, None, None);
        assert_eq!(reasons(&out), ["T3", "T2", "T1"]);
        assert_eq!(reasons(&input), ["T1", "T2", "T3"]);
    }

    #[test]
    fn test_events_name_is_substring() {
        let input = [
            event("web-7f9c6-abcde", "Normal", "a"),
            event("db-0", "Normal", "b"),
            event("web-7f9c6-zzzzz", "Normal", "c"),
        ];
        let out = events(&input, Some("web-7f9c6"), None);
        assert_eq!(reasons(&out), ["c", "a"]);
    }

    #[test]
    fn test_events_type_is_exact() {
        let input = [
            event("web-1", "Normal", "a"),
            event("web-1", "Warning", "b"),
            event("web-1", "WarningX", "c"),
        ];
        let out = events(&input, None, Some(EventType::Warning));
        assert_eq!(reasons(&out), ["b"]);
    }

    #[test]
    fn test_restart_threshold_is_strict() {
        let pods = [restarting("web-1", 5), restarting("web-2", 6)];

        let out = restarting_above(&pods, 5);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "web-2");

        let out = restarting_above(&pods, 4);
        assert_eq!(out.len(), 2);
    }
}
