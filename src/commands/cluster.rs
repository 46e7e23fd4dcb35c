//! Cluster-wide views and pod resource usage

use k8s_openapi::api::core::v1::{Namespace, Node};
use serde::Serialize;

use super::Inspector;
use crate::k8s::command::CommandSpec;
use crate::k8s::envelope::Envelope;
use crate::k8s::kubectl::Executor;
use crate::k8s::parse::parse_table;
use crate::k8s::request::{QueryRequest, ResourceKind, Target, Verb};
use crate::resources::metrics::{MetricsRow, metrics_rows};
use crate::resources::nodes::{NamespaceSummary, NodeSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Namespaces {
    pub namespaces: Vec<NamespaceSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterInfo {
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nodes {
    pub nodes: Vec<NodeSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceUsage {
    pub namespace: String,
    pub metrics: Vec<MetricsRow>,
}

impl<E: Executor> Inspector<E> {
    pub async fn list_namespaces(&self) -> Envelope<Namespaces> {
        let request = QueryRequest::get(ResourceKind::Namespace).json();

        self.fetch::<Namespace>(&request)
            .await
            .map(|items| Namespaces {
                namespaces: items.iter().map(NamespaceSummary::from).collect(),
            })
            .into()
    }

    /// Raw `kubectl cluster-info` text
    pub async fn get_cluster_info(&self) -> Envelope<ClusterInfo> {
        self.execute(&CommandSpec::cluster_info())
            .await
            .map(|output| ClusterInfo { info: output.stdout })
            .into()
    }

    pub async fn get_nodes(&self) -> Envelope<Nodes> {
        let request = QueryRequest::get(ResourceKind::Node).json();

        self.fetch::<Node>(&request)
            .await
            .map(|items| Nodes {
                nodes: items.iter().map(NodeSummary::from).collect(),
            })
            .into()
    }

    /// CPU and memory from `kubectl top pods`. A cluster without a metrics
    /// API yields `MetricsUnavailable`.
    pub async fn get_resource_usage(&self, namespace: &str, pod: Option<&str>) -> Envelope<ResourceUsage> {
        let target = super::given(pod).map_or(Target::All, |p| Target::ByName(p.to_string()));
        let request = QueryRequest::new(Verb::Top, ResourceKind::Metrics)
            .in_namespace(namespace)
            .target(target);

        self.run(&request)
            .await
            .map_err(|err| err.classify_metrics())
            .map(|output| ResourceUsage {
                namespace: namespace.to_string(),
                metrics: metrics_rows(&parse_table(&output.stdout, true)),
            })
            .into()
    }
}
