//! Pod status, logs and troubleshooting views

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Pod;
use serde::Serialize;

use super::Inspector;
use crate::k8s::envelope::Envelope;
use crate::k8s::kubectl::Executor;
use crate::k8s::parse::{parse_lines, parse_table};
use crate::k8s::request::{
    LogOptions, OutputFormat, PhaseFilter, QueryRequest, ResourceKind, Target, Verb,
};
use crate::resources::filter;
use crate::resources::pods::{FailedPod, PendingPod, RestartingPod};
use crate::utils::errors::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStatus {
    pub namespace: String,
    pub app: String,
    /// `kubectl get pods -o wide` table, trimmed
    pub pods_list: String,
    /// `kubectl describe pod` output per listed pod, or the error that
    /// describing it produced
    pub pod_descriptions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodLogs {
    pub namespace: String,
    pub pod_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    pub logs: String,
    pub line_count: usize,
    /// Approximation: true when at least `tail` lines came back
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedPods {
    pub failed_pods: Vec<FailedPod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPods {
    pub pending_pods: Vec<PendingPod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartingPods {
    pub threshold: i64,
    pub restarting_pods: Vec<RestartingPod>,
}

impl<E: Executor> Inspector<E> {
    /// List the targeted pods and describe each of them. `app` is the
    /// caller's own text and is echoed back unchanged.
    ///
    /// A pod that cannot be described keeps its error as its description;
    /// only a failed listing fails the operation.
    pub async fn app_status(&self, namespace: &str, app: &str, target: Target) -> Envelope<AppStatus> {
        self.try_app_status(namespace, app, target).await.into()
    }

    async fn try_app_status(&self, namespace: &str, app: &str, target: Target) -> Result<AppStatus> {
        let list = QueryRequest::get(ResourceKind::Pod)
            .in_namespace(namespace)
            .target(target)
            .output(OutputFormat::Wide);

        let output = self.run(&list).await?;
        let table = parse_table(&output.stdout, true);

        let mut pod_descriptions = BTreeMap::new();
        for pod in table.first_column() {
            let describe = QueryRequest::new(Verb::Describe, ResourceKind::Pod)
                .in_namespace(namespace)
                .named(pod.clone());

            let description = match self.run(&describe).await {
                Ok(out) => out.stdout.trim().to_string(),
                Err(err) => {
                    crate::log_warn!("Failed to describe pod {}: {}", pod, err);
                    format!("Error describing pod: {}", err)
                }
            };
            pod_descriptions.insert(pod, description);
        }

        Ok(AppStatus {
            namespace: namespace.to_string(),
            app: app.to_string(),
            pods_list: table.text,
            pod_descriptions,
        })
    }

    /// Tail of a pod's log
    pub async fn pod_logs(&self, namespace: &str, pod: &str, options: LogOptions) -> Envelope<PodLogs> {
        self.try_pod_logs(namespace, pod, options).await.into()
    }

    async fn try_pod_logs(&self, namespace: &str, pod: &str, options: LogOptions) -> Result<PodLogs> {
        let tail = options.tail;
        let container = options.container.clone();
        let request = QueryRequest::new(Verb::Logs, ResourceKind::Pod)
            .in_namespace(namespace)
            .named(pod)
            .log_options(options);

        let output = self.run(&request).await?;
        let (logs, line_count) = parse_lines(&output.stdout);

        Ok(PodLogs {
            namespace: namespace.to_string(),
            pod_name: pod.to_string(),
            container,
            logs,
            line_count,
            truncated: line_count >= tail as usize,
        })
    }

    /// Pods in any phase other than Running or Succeeded
    pub async fn get_failed_pods(&self, namespace: &str) -> Envelope<FailedPods> {
        self.pods_in_phase(namespace, PhaseFilter::Failed)
            .await
            .map(|pods| FailedPods {
                failed_pods: pods.iter().map(FailedPod::from).collect(),
            })
            .into()
    }

    pub async fn get_pending_pods(&self, namespace: &str) -> Envelope<PendingPods> {
        self.pods_in_phase(namespace, PhaseFilter::Pending)
            .await
            .map(|pods| PendingPods {
                pending_pods: pods.iter().map(PendingPod::from).collect(),
            })
            .into()
    }

    /// Pods whose restart total across containers exceeds `threshold`
    pub async fn get_restarting_pods(&self, namespace: &str, threshold: i64) -> Envelope<RestartingPods> {
        self.try_restarting_pods(namespace, threshold).await.into()
    }

    async fn try_restarting_pods(&self, namespace: &str, threshold: i64) -> Result<RestartingPods> {
        let request = QueryRequest::get(ResourceKind::Pod).in_namespace(namespace).json();
        let pods: Vec<Pod> = self.fetch(&request).await?;
        let all: Vec<RestartingPod> = pods.iter().map(RestartingPod::from).collect();

        Ok(RestartingPods {
            threshold,
            restarting_pods: filter::restarting_above(&all, threshold),
        })
    }

    async fn pods_in_phase(&self, namespace: &str, phase: PhaseFilter) -> Result<Vec<Pod>> {
        let request = QueryRequest::get(ResourceKind::Pod)
            .in_namespace(namespace)
            .json()
            .phase(phase);
        self.fetch(&request).await
    }
}
