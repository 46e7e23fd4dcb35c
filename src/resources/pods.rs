//! Pod troubleshooting views

use k8s_openapi::api::core::v1::{ContainerState, ContainerStatus, Pod, PodCondition};
use serde::Serialize;

use super::{name_of, namespace_of};

/// Container statuses, empty when the pod has none yet
pub fn container_statuses(pod: &Pod) -> &[ContainerStatus] {
    pod.status
        .as_ref()
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default()
}

/// Sum of `restartCount` across all containers
pub fn total_restarts(pod: &Pod) -> i64 {
    container_statuses(pod)
        .iter()
        .map(|cs| i64::from(cs.restart_count))
        .sum()
}

fn phase(pod: &Pod) -> Option<String> {
    pod.status.as_ref().and_then(|s| s.phase.clone())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedContainer {
    pub name: String,
    pub ready: bool,
    pub restart_count: i32,
    pub state: Option<ContainerState>,
    pub last_state: Option<ContainerState>,
}

/// Pod that is neither Running nor Succeeded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedPod {
    pub name: String,
    pub namespace: String,
    pub phase: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub container_statuses: Vec<FailedContainer>,
}

impl From<&Pod> for FailedPod {
    fn from(pod: &Pod) -> Self {
        let status = pod.status.as_ref();
        Self {
            name: name_of(&pod.metadata),
            namespace: namespace_of(&pod.metadata),
            phase: phase(pod),
            reason: status.and_then(|s| s.reason.clone()),
            message: status.and_then(|s| s.message.clone()),
            container_statuses: container_statuses(pod)
                .iter()
                .map(|cs| FailedContainer {
                    name: cs.name.clone(),
                    ready: cs.ready,
                    restart_count: cs.restart_count,
                    state: cs.state.clone(),
                    last_state: cs.last_state.clone(),
                })
                .collect(),
        }
    }
}

/// Pod waiting to be scheduled or started
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPod {
    pub name: String,
    pub namespace: String,
    pub phase: Option<String>,
    pub conditions: Vec<PodCondition>,
    pub container_statuses: Vec<ContainerStatus>,
}

impl From<&Pod> for PendingPod {
    fn from(pod: &Pod) -> Self {
        Self {
            name: name_of(&pod.metadata),
            namespace: namespace_of(&pod.metadata),
            phase: phase(pod),
            conditions: pod
                .status
                .as_ref()
                .and_then(|s| s.conditions.clone())
                .unwrap_or_default(),
            container_statuses: container_statuses(pod).to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartingContainer {
    pub name: String,
    pub restart_count: i32,
    pub last_state: Option<ContainerState>,
}

/// Pod with its aggregated restart total
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartingPod {
    pub name: String,
    pub namespace: String,
    pub total_restarts: i64,
    pub container_statuses: Vec<RestartingContainer>,
}

impl From<&Pod> for RestartingPod {
    fn from(pod: &Pod) -> Self {
        Self {
            name: name_of(&pod.metadata),
            namespace: namespace_of(&pod.metadata),
            total_restarts: total_restarts(pod),
            container_statuses: container_statuses(pod)
                .iter()
                .map(|cs| RestartingContainer {
                    name: cs.name.clone(),
                    restart_count: cs.restart_count,
                    last_state: cs.last_state.clone(),
                })
                .collect(),
        }
    }
}
