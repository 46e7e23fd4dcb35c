//! kubectl plumbing: requests, argument vectors, process execution, decoding

pub mod command;
pub mod envelope;
pub mod kubectl;
pub mod parse;
pub mod request;

pub use command::{CommandSpec, DEFAULT_MAX_OUTPUT_BYTES};
pub use envelope::Envelope;
pub use kubectl::{Executor, Kubectl, RawOutput};
pub use request::{EventType, LogOptions, QueryRequest, ResourceKind, Target};
