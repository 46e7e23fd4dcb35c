//! Service, Ingress and Endpoints summaries

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{EndpointAddress, EndpointSubset, Endpoints, Service, ServicePort};
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, Ingress, IngressLoadBalancerIngress, IngressRule, IngressTLS,
    ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::Serialize;

use super::{age_of, name_of, namespace_of};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSummary {
    pub name: Option<String>,
    pub protocol: Option<String>,
    pub port: i32,
    pub target_port: Option<IntOrString>,
    pub node_port: Option<i32>,
}

impl From<&ServicePort> for PortSummary {
    fn from(port: &ServicePort) -> Self {
        Self {
            name: port.name.clone(),
            protocol: port.protocol.clone(),
            port: port.port,
            target_port: port.target_port.clone(),
            node_port: port.node_port,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    #[serde(rename = "clusterIP")]
    pub cluster_ip: Option<String>,
    #[serde(rename = "externalIP")]
    pub external_ip: Vec<String>,
    pub ports: Vec<PortSummary>,
    pub selector: BTreeMap<String, String>,
    pub age: Option<Time>,
}

/// `spec.externalIPs` when set, otherwise the load balancer's ingress
/// addresses (ip, falling back to hostname).
fn external_addresses(svc: &Service) -> Vec<String> {
    let declared = svc
        .spec
        .as_ref()
        .and_then(|s| s.external_ips.clone())
        .unwrap_or_default();
    if !declared.is_empty() {
        return declared;
    }

    svc.status
        .as_ref()
        .and_then(|s| s.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .map(|ingress| {
            ingress
                .iter()
                .filter_map(|i| i.ip.clone().or_else(|| i.hostname.clone()))
                .collect()
        })
        .unwrap_or_default()
}

fn ports_of(svc: &Service) -> Vec<PortSummary> {
    svc.spec
        .as_ref()
        .and_then(|s| s.ports.as_ref())
        .map(|ports| ports.iter().map(PortSummary::from).collect())
        .unwrap_or_default()
}

fn selector_of(svc: &Service) -> BTreeMap<String, String> {
    svc.spec
        .as_ref()
        .and_then(|s| s.selector.clone())
        .unwrap_or_default()
}

impl From<&Service> for ServiceSummary {
    fn from(svc: &Service) -> Self {
        let spec = svc.spec.as_ref();
        Self {
            name: name_of(&svc.metadata),
            namespace: namespace_of(&svc.metadata),
            type_: spec.and_then(|s| s.type_.clone()),
            cluster_ip: spec.and_then(|s| s.cluster_ip.clone()),
            external_ip: external_addresses(svc),
            ports: ports_of(svc),
            selector: selector_of(svc),
            age: age_of(&svc.metadata),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendSummary {
    pub service: Option<String>,
    pub port: Option<ServiceBackendPort>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSummary {
    pub path: Option<String>,
    pub path_type: String,
    pub backend: BackendSummary,
}

impl From<&HTTPIngressPath> for PathSummary {
    fn from(path: &HTTPIngressPath) -> Self {
        let service = path.backend.service.as_ref();
        Self {
            path: path.path.clone(),
            path_type: path.path_type.clone(),
            backend: BackendSummary {
                service: service.map(|s| s.name.clone()),
                port: service.and_then(|s| s.port.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSummary {
    pub host: Option<String>,
    pub paths: Vec<PathSummary>,
}

impl From<&IngressRule> for RuleSummary {
    fn from(rule: &IngressRule) -> Self {
        Self {
            host: rule.host.clone(),
            paths: rule
                .http
                .as_ref()
                .map(|http| http.paths.iter().map(PathSummary::from).collect())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressSummary {
    pub name: String,
    pub namespace: String,
    pub class_name: Option<String>,
    pub rules: Vec<RuleSummary>,
    pub tls: Vec<IngressTLS>,
    #[serde(rename = "loadBalancerIPs")]
    pub load_balancer_ips: Vec<IngressLoadBalancerIngress>,
    pub age: Option<Time>,
}

impl IngressSummary {
    /// True when any rule routes exactly this host
    pub fn serves_host(&self, hostname: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.host.as_deref() == Some(hostname))
    }
}

impl From<&Ingress> for IngressSummary {
    fn from(ing: &Ingress) -> Self {
        let spec = ing.spec.as_ref();
        Self {
            name: name_of(&ing.metadata),
            namespace: namespace_of(&ing.metadata),
            class_name: spec.and_then(|s| s.ingress_class_name.clone()),
            rules: spec
                .and_then(|s| s.rules.as_ref())
                .map(|rules| rules.iter().map(RuleSummary::from).collect())
                .unwrap_or_default(),
            tls: spec.and_then(|s| s.tls.clone()).unwrap_or_default(),
            load_balancer_ips: ing
                .status
                .as_ref()
                .and_then(|s| s.load_balancer.as_ref())
                .and_then(|lb| lb.ingress.clone())
                .unwrap_or_default(),
            age: age_of(&ing.metadata),
        }
    }
}

/// Service half of the service/endpoints view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    #[serde(rename = "clusterIP")]
    pub cluster_ip: Option<String>,
    pub ports: Vec<PortSummary>,
    pub selector: BTreeMap<String, String>,
}

impl From<&Service> for ServiceRef {
    fn from(svc: &Service) -> Self {
        let spec = svc.spec.as_ref();
        Self {
            name: name_of(&svc.metadata),
            type_: spec.and_then(|s| s.type_.clone()),
            cluster_ip: spec.and_then(|s| s.cluster_ip.clone()),
            ports: ports_of(svc),
            selector: selector_of(svc),
        }
    }
}

/// Endpoint addresses; ready and not-ready come from the first subset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointsSummary {
    pub subsets: Vec<EndpointSubset>,
    pub ready_addresses: Vec<EndpointAddress>,
    pub not_ready_addresses: Vec<EndpointAddress>,
}

impl From<&Endpoints> for EndpointsSummary {
    fn from(ep: &Endpoints) -> Self {
        let subsets = ep.subsets.clone().unwrap_or_default();
        let first = subsets.first();
        Self {
            ready_addresses: first
                .and_then(|s| s.addresses.clone())
                .unwrap_or_default(),
            not_ready_addresses: first
                .and_then(|s| s.not_ready_addresses.clone())
                .unwrap_or_default(),
            subsets,
        }
    }
}
