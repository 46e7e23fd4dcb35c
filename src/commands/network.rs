//! Services, Ingresses and Endpoints

use k8s_openapi::api::core::v1::{Endpoints, Service};
use k8s_openapi::api::networking::v1::Ingress;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Inspector;
use crate::k8s::envelope::Envelope;
use crate::k8s::kubectl::Executor;
use crate::k8s::request::{QueryRequest, ResourceKind, Target};
use crate::resources::filter;
use crate::resources::network::{EndpointsSummary, IngressSummary, ServiceRef, ServiceSummary};
use crate::utils::errors::{InspectError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Services {
    pub services: Vec<ServiceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingresses {
    pub ingresses: Vec<IngressSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceEndpoints {
    pub service: ServiceRef,
    pub endpoints: EndpointsSummary,
}

impl<E: Executor> Inspector<E> {
    /// Services in a namespace, or the one named
    pub async fn get_services(&self, namespace: &str, name: Option<&str>) -> Envelope<Services> {
        let target = super::given(name).map_or(Target::All, |n| Target::ByName(n.to_string()));
        let request = QueryRequest::get(ResourceKind::Service)
            .in_namespace(namespace)
            .target(target)
            .json();

        self.fetch::<Service>(&request)
            .await
            .map(|items| Services {
                services: items.iter().map(ServiceSummary::from).collect(),
            })
            .into()
    }

    /// Ingresses in a namespace, keeping only those routing `hostname` when given
    pub async fn get_ingresses(&self, namespace: &str, hostname: Option<&str>) -> Envelope<Ingresses> {
        let request = QueryRequest::get(ResourceKind::Ingress)
            .in_namespace(namespace)
            .json();

        self.fetch::<Ingress>(&request)
            .await
            .map(|items| {
                let all: Vec<IngressSummary> = items.iter().map(IngressSummary::from).collect();
                Ingresses {
                    ingresses: filter::ingresses_for_host(&all, super::given(hostname)),
                }
            })
            .into()
    }

    /// A Service together with its Endpoints. Both lookups run concurrently
    /// and both must succeed.
    pub async fn get_service_endpoints(&self, namespace: &str, service: &str) -> Envelope<ServiceEndpoints> {
        self.try_service_endpoints(namespace, service).await.into()
    }

    async fn try_service_endpoints(&self, namespace: &str, service: &str) -> Result<ServiceEndpoints> {
        let svc_request = QueryRequest::get(ResourceKind::Service)
            .in_namespace(namespace)
            .named(service)
            .json();
        let ep_request = QueryRequest::get(ResourceKind::Endpoints)
            .in_namespace(namespace)
            .named(service)
            .json();

        let (svc, endpoints) = tokio::try_join!(
            self.fetch_one::<Service>(&svc_request),
            self.fetch_one::<Endpoints>(&ep_request),
        )?;

        Ok(ServiceEndpoints {
            service: ServiceRef::from(&svc),
            endpoints: EndpointsSummary::from(&endpoints),
        })
    }

    async fn fetch_one<T: DeserializeOwned>(&self, request: &QueryRequest) -> Result<T> {
        self.fetch(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| InspectError::ParseError("expected a single object".to_string()))
    }
}
