//! Read-only Kubernetes inspection through kubectl.
//!
//! [`Inspector`] exposes typed queries (pods, logs, deployments, services,
//! events, nodes, metrics and troubleshooting views). Each one builds a
//! kubectl argument vector, runs it, decodes the output into normalized
//! records and returns an [`Envelope`].

pub mod commands;
pub mod config;
pub mod k8s;
pub mod resources;
pub mod utils;

pub use commands::Inspector;
pub use k8s::{Envelope, Executor, Kubectl};
pub use utils::errors::{InspectError, Result};
