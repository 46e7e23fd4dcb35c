//! Deployments and ConfigMaps

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ConfigMap;
use serde::Serialize;

use super::Inspector;
use crate::k8s::envelope::Envelope;
use crate::k8s::kubectl::Executor;
use crate::k8s::request::{QueryRequest, ResourceKind, Target};
use crate::resources::workloads::{ConfigMapSummary, DeploymentSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deployments {
    pub deployments: Vec<DeploymentSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigMaps {
    pub configmaps: Vec<ConfigMapSummary>,
}

impl<E: Executor> Inspector<E> {
    /// Deployments in a namespace, optionally narrowed by a label selector
    pub async fn get_deployments(&self, namespace: &str, selector: Option<&str>) -> Envelope<Deployments> {
        let target = super::given(selector).map_or(Target::All, |s| Target::BySelector(s.to_string()));
        let request = QueryRequest::get(ResourceKind::Deployment)
            .in_namespace(namespace)
            .target(target)
            .json();

        self.fetch::<Deployment>(&request)
            .await
            .map(|items| Deployments {
                deployments: items.iter().map(DeploymentSummary::from).collect(),
            })
            .into()
    }

    /// ConfigMaps in a namespace, or the one named
    pub async fn get_configmaps(&self, namespace: &str, name: Option<&str>) -> Envelope<ConfigMaps> {
        let target = super::given(name).map_or(Target::All, |n| Target::ByName(n.to_string()));
        let request = QueryRequest::get(ResourceKind::ConfigMap)
            .in_namespace(namespace)
            .target(target)
            .json();

        self.fetch::<ConfigMap>(&request)
            .await
            .map(|items| ConfigMaps {
                configmaps: items.iter().map(ConfigMapSummary::from).collect(),
            })
            .into()
    }
}
