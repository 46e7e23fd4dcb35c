//! Scripted executor for exercising operations without a cluster

use std::sync::Mutex;

use crate::k8s::command::CommandSpec;
use crate::k8s::kubectl::{Executor, RawOutput};
use crate::utils::errors::{InspectError, Result};

type Responder = Box<dyn Fn(&[String]) -> Result<RawOutput> + Send + Sync>;

pub struct FakeExecutor {
    respond: Responder,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeExecutor {
    /// Answer every invocation with `respond(args)`
    pub fn new(respond: impl Fn(&[String]) -> Result<RawOutput> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every invocation with the same stdout
    pub fn stdout(stdout: &'static str) -> Self {
        Self::new(move |_| Ok(RawOutput::from_stdout(stdout)))
    }

    /// Fail every invocation with kubectl's diagnostic
    pub fn failing(message: &'static str) -> Self {
        Self::new(move |_| Err(InspectError::execution(message)))
    }

    /// Argument vectors seen so far, in call order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Executor for FakeExecutor {
    async fn execute(&self, spec: &CommandSpec) -> Result<RawOutput> {
        self.calls.lock().unwrap().push(spec.args().to_vec());
        (self.respond)(spec.args())
    }
}

/// Collapse an argument vector into a single string for assertions
pub fn joined(args: &[String]) -> String {
    args.join(" ")
}
