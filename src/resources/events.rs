//! Event summaries

use k8s_openapi::api::core::v1::Event;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvolvedObject {
    pub kind: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub object: InvolvedObject,
    /// Occurrences, 1 when the backend omits it
    pub count: i32,
    pub first_time: Option<Time>,
    pub last_time: Option<Time>,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            type_: event.type_.clone(),
            reason: event.reason.clone(),
            message: event.message.clone(),
            object: InvolvedObject {
                kind: event.involved_object.kind.clone(),
                name: event.involved_object.name.clone(),
            },
            count: event.count.filter(|c| *c > 0).unwrap_or(1),
            first_time: event.first_timestamp.clone(),
            last_time: event.last_timestamp.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::parse::{Shape, parse_items};

    #[test]
    fn test_event_summary() {
        let json = r#"{
            "apiVersion": "v1",
            "kind": "List",
            "items": [
                {
                    "apiVersion": "v1", "kind": "Event",
                    "metadata": {"name": "web-1.17c"},
                    "involvedObject": {"kind": "Pod", "name": "web-1"},
                    "type": "Warning", "reason": "BackOff", "message": "Back-off restarting failed container",
                    "count": 7,
                    "firstTimestamp": "2024-05-01T10:00:00Z", "lastTimestamp": "2024-05-01T10:05:00Z"
                },
                {
                    "apiVersion": "v1", "kind": "Event",
                    "metadata": {"name": "web-2.18a"},
                    "involvedObject": {"kind": "Pod", "name": "web-2"},
                    "type": "Normal", "reason": "Scheduled"
                }
            ]
        }"#;
        let events: Vec<Event> = parse_items(json, Shape::List).unwrap();
        let summaries: Vec<EventSummary> = events.iter().map(EventSummary::from).collect();

        assert_eq!(summaries[0].count, 7);
        assert_eq!(summaries[0].object.name.as_deref(), Some("web-1"));
        assert_eq!(summaries[1].count, 1);
        assert!(summaries[1].last_time.is_none());

        let value = serde_json::to_value(&summaries[0]).unwrap();
        assert_eq!(value["type"], "Warning");
        assert_eq!(value["object"]["kind"], "Pod");
        assert!(value["lastTime"].as_str().unwrap().starts_with("2024-05-01T10:05:00"));
    }
}
