//! Node and Namespace summaries

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Namespace, Node};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::Serialize;

use super::{age_of, name_of};

const ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";

/// Coarse node health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeStatus {
    Ready,
    NotReady,
}

/// `Ready` iff a `Ready` condition reports `True`
pub fn node_status(node: &Node) -> NodeStatus {
    let ready = node
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .and_then(|conditions| conditions.iter().find(|c| c.type_ == "Ready"))
        .is_some_and(|c| c.status == "True");

    if ready {
        NodeStatus::Ready
    } else {
        NodeStatus::NotReady
    }
}

/// Role names from `node-role.kubernetes.io/<role>` label keys
pub fn node_roles(node: &Node) -> Vec<String> {
    node.metadata
        .labels
        .as_ref()
        .map(|labels| {
            labels
                .keys()
                .filter_map(|key| key.strip_prefix(ROLE_LABEL_PREFIX))
                .map(|role| role.split('/').next().unwrap_or(role).to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeResources {
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub pods: Option<String>,
}

impl From<Option<&BTreeMap<String, Quantity>>> for NodeResources {
    fn from(resources: Option<&BTreeMap<String, Quantity>>) -> Self {
        let get = |key: &str| {
            resources
                .and_then(|r| r.get(key))
                .map(|q| q.0.clone())
        };
        Self {
            cpu: get("cpu"),
            memory: get("memory"),
            pods: get("pods"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub name: String,
    pub status: NodeStatus,
    pub roles: Vec<String>,
    pub version: Option<String>,
    pub os: Option<String>,
    pub container_runtime: Option<String>,
    pub capacity: NodeResources,
    pub allocatable: NodeResources,
    pub age: Option<Time>,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        let status = node.status.as_ref();
        let info = status.and_then(|s| s.node_info.as_ref());

        Self {
            name: name_of(&node.metadata),
            status: node_status(node),
            roles: node_roles(node),
            version: info.map(|i| i.kubelet_version.clone()),
            os: info.map(|i| i.os_image.clone()),
            container_runtime: info.map(|i| i.container_runtime_version.clone()),
            capacity: NodeResources::from(status.and_then(|s| s.capacity.as_ref())),
            allocatable: NodeResources::from(status.and_then(|s| s.allocatable.as_ref())),
            age: age_of(&node.metadata),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceSummary {
    pub name: String,
    pub status: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub age: Option<Time>,
}

impl From<&Namespace> for NamespaceSummary {
    fn from(ns: &Namespace) -> Self {
        Self {
            name: name_of(&ns.metadata),
            status: ns.status.as_ref().and_then(|s| s.phase.clone()),
            labels: ns.metadata.labels.clone().unwrap_or_default(),
            age: age_of(&ns.metadata),
        }
    }
}
