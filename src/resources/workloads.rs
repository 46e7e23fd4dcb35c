//! Deployment and ConfigMap summaries

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentCondition};
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::Serialize;

use super::{age_of, name_of, namespace_of};

/// Replica counts, each defaulting to 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Replicas {
    pub desired: i32,
    pub ready: i32,
    pub available: i32,
    pub unavailable: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSummary {
    pub name: String,
    pub namespace: String,
    pub replicas: Replicas,
    pub images: Vec<String>,
    pub conditions: Vec<DeploymentCondition>,
    pub age: Option<Time>,
}

impl From<&Deployment> for DeploymentSummary {
    fn from(deploy: &Deployment) -> Self {
        let spec = deploy.spec.as_ref();
        let status = deploy.status.as_ref();

        let replicas = Replicas {
            desired: spec.and_then(|s| s.replicas).unwrap_or_default(),
            ready: status.and_then(|s| s.ready_replicas).unwrap_or_default(),
            available: status.and_then(|s| s.available_replicas).unwrap_or_default(),
            unavailable: status
                .and_then(|s| s.unavailable_replicas)
                .unwrap_or_default(),
        };

        let images = spec
            .and_then(|s| s.template.spec.as_ref())
            .map(|pod| {
                pod.containers
                    .iter()
                    .filter_map(|c| c.image.clone())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: name_of(&deploy.metadata),
            namespace: namespace_of(&deploy.metadata),
            replicas,
            images,
            conditions: status
                .and_then(|s| s.conditions.clone())
                .unwrap_or_default(),
            age: age_of(&deploy.metadata),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapSummary {
    pub name: String,
    pub namespace: String,
    pub data: BTreeMap<String, String>,
    pub data_keys: Vec<String>,
    pub age: Option<Time>,
}

impl From<&ConfigMap> for ConfigMapSummary {
    fn from(cm: &ConfigMap) -> Self {
        let data = cm.data.clone().unwrap_or_default();
        let data_keys = data.keys().cloned().collect();

        Self {
            name: name_of(&cm.metadata),
            namespace: namespace_of(&cm.metadata),
            data,
            data_keys,
            age: age_of(&cm.metadata),
        }
    }
}
