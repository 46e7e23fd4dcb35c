//! Events and free-form `kubectl describe`

use k8s_openapi::api::core::v1::Event;
use serde::Serialize;

use super::Inspector;
use crate::k8s::envelope::Envelope;
use crate::k8s::kubectl::Executor;
use crate::k8s::request::{EventType, QueryRequest, ResourceKind, Verb};
use crate::resources::events::EventSummary;
use crate::resources::filter;
use crate::utils::errors::Result;

/// Backend sort key; events arrive oldest first
const EVENT_SORT_KEY: &str = ".lastTimestamp";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Events {
    /// Most recent first
    pub events: Vec<EventSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub resource_type: String,
    pub resource_name: String,
    /// Absent for cluster-scoped kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub description: String,
}

impl<E: Executor> Inspector<E> {
    /// Namespace events, optionally narrowed to objects whose name contains
    /// `resource_name` and to one event type
    pub async fn get_events(
        &self,
        namespace: &str,
        resource_name: Option<&str>,
        event_type: Option<EventType>,
    ) -> Envelope<Events> {
        let request = QueryRequest::get(ResourceKind::Event)
            .in_namespace(namespace)
            .json()
            .sort_by(EVENT_SORT_KEY);

        self.fetch::<Event>(&request)
            .await
            .map(|items| {
                let all: Vec<EventSummary> = items.iter().map(EventSummary::from).collect();
                Events {
                    events: filter::events(&all, super::given(resource_name), event_type),
                }
            })
            .into()
    }

    /// `kubectl describe <kind> <name>`. `namespace` is ignored for
    /// cluster-scoped kinds.
    pub async fn describe_resource(
        &self,
        namespace: &str,
        kind: ResourceKind,
        name: &str,
    ) -> Envelope<Description> {
        self.try_describe(namespace, kind, name).await.into()
    }

    async fn try_describe(&self, namespace: &str, kind: ResourceKind, name: &str) -> Result<Description> {
        let request = QueryRequest::new(Verb::Describe, kind)
            .in_namespace(namespace)
            .named(name);
        let output = self.run(&request).await?;

        Ok(Description {
            resource_type: kind.singular().to_string(),
            resource_name: name.to_string(),
            namespace: kind.is_namespaced().then(|| namespace.to_string()),
            description: output.stdout,
        })
    }
}
