//! Normalized records built from decoded Kubernetes objects

pub mod events;
pub mod filter;
pub mod metrics;
pub mod network;
pub mod nodes;
pub mod pods;
pub mod workloads;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};

pub(crate) fn name_of(meta: &ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

pub(crate) fn namespace_of(meta: &ObjectMeta) -> String {
    meta.namespace.clone().unwrap_or_default()
}

/// Creation timestamp, reported as the object's age
pub(crate) fn age_of(meta: &ObjectMeta) -> Option<Time> {
    meta.creation_timestamp.clone()
}
