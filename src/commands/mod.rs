//! Inspection operations.
//!
//! Each operation runs the request -> command -> process -> parse ->
//! normalize -> filter pipeline and always returns an
//! [`Envelope`](crate::k8s::envelope::Envelope).

pub mod cluster;
pub mod events;
pub mod network;
pub mod pods;
pub mod workloads;

#[cfg(test)]
pub(crate) mod fake;

use serde::de::DeserializeOwned;

use crate::k8s::command::{self, CommandSpec};
use crate::k8s::kubectl::{Executor, Kubectl, RawOutput};
use crate::k8s::parse::{Shape, parse_items};
use crate::k8s::request::{QueryRequest, Target};
use crate::utils::errors::Result;

/// An empty optional filter means "not set"
fn given(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Read-only view of a cluster through an [`Executor`].
///
/// Holds no state between calls and can be shared across tasks.
#[derive(Debug, Clone, Default)]
pub struct Inspector<E = Kubectl> {
    executor: E,
}

impl<E: Executor> Inspector<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Build and run one request
    async fn run(&self, request: &QueryRequest) -> Result<RawOutput> {
        let spec = command::build(request)?;
        self.execute(&spec).await
    }

    async fn execute(&self, spec: &CommandSpec) -> Result<RawOutput> {
        crate::log_debug!("kubectl {}", spec.display());
        self.executor.execute(spec).await
    }

    /// Run a JSON request and decode its objects as a sequence
    async fn fetch<T: DeserializeOwned>(&self, request: &QueryRequest) -> Result<Vec<T>> {
        let output = self.run(request).await?;
        let shape = match &request.target {
            Target::ByName(name) => Shape::for_name(Some(name.as_str())),
            _ => Shape::List,
        };
        parse_items(&output.stdout, shape)
    }
}
