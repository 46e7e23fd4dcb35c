//! Error taxonomy for inspection operations, with actionable suggestions

use colored::Colorize;
use thiserror::Error;

const METRICS_UNAVAILABLE_MARKER: &str = "Metrics API not available";

const METRICS_SERVER_MANIFEST: &str =
    "https://github.com/kubernetes-sigs/metrics-server/releases/latest/download/components.yaml";

/// Failure raised anywhere between request validation and result decoding.
///
/// Every variant is converted to an error envelope at the operation boundary,
/// so none of these ever reach the caller as a `Result::Err`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InspectError {
    /// Request fields are missing or inconsistent for the resource kind.
    /// Raised before any process is spawned.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// kubectl exited non-zero, could not be started, overflowed the output
    /// buffer or timed out. The message is kubectl's own diagnostic text.
    #[error("{message}")]
    ExecutionFailed { message: String },

    /// kubectl succeeded but its output was not the expected JSON document.
    #[error("failed to parse kubectl output: {0}")]
    ParseError(String),

    /// `kubectl top` could not reach the metrics API.
    #[error(
        "Metrics server not installed in cluster. Install with: kubectl apply -f {}",
        METRICS_SERVER_MANIFEST
    )]
    MetricsUnavailable,
}

/// Result type alias for inspection operations
pub type Result<T> = std::result::Result<T, InspectError>;

impl InspectError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: message.into(),
        }
    }

    /// Reclassify an execution failure of `kubectl top` as a missing metrics API.
    ///
    /// kubectl exits 1 for every failure, so the diagnostic text is the only
    /// signal available.
    pub fn classify_metrics(self) -> Self {
        match self {
            Self::ExecutionFailed { ref message } if message.contains(METRICS_UNAVAILABLE_MARKER) => {
                Self::MetricsUnavailable
            }
            other => other,
        }
    }

    /// Operator-facing hints for resolving the failure
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidRequest(_) => {
                vec!["Check the namespace, resource name and option values".to_string()]
            }
            Self::ExecutionFailed { message } => suggestions_for_diagnostic(message),
            Self::ParseError(_) => vec![
                "Verify the kubectl version supports '-o json' for this resource".to_string(),
                "Run with -vv to see the executed command".to_string(),
            ],
            Self::MetricsUnavailable => vec![
                format!("Install metrics-server: kubectl apply -f {}", METRICS_SERVER_MANIFEST),
                "Wait for the metrics-server deployment to become ready".to_string(),
            ],
        }
    }

    /// Display the error with suggestions on stderr
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self);

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            eprintln!();
            eprintln!("{}", "Suggestions:".yellow().bold());
            for suggestion in &suggestions {
                eprintln!("  {} {}", "→".blue(), suggestion);
            }
        }
    }
}

/// Pattern match common kubectl diagnostics
fn suggestions_for_diagnostic(message: &str) -> Vec<String> {
    let lower = message.to_lowercase();

    if lower.contains("not found in path") || lower.contains("failed to start") {
        return vec![
            "Install kubectl from: https://kubernetes.io/docs/tasks/tools/".to_string(),
            "Or point --kubectl at the binary".to_string(),
        ];
    }

    if lower.contains("forbidden") || lower.contains("unauthorized") {
        return vec![
            "Verify the current context has read access to this resource".to_string(),
            "Check with: kubectl auth can-i get <resource> -n <namespace>".to_string(),
        ];
    }

    if lower.contains("connection refused") || lower.contains("timed out") {
        return vec![
            "Check that the cluster is reachable".to_string(),
            "Verify the active context: kubectl config current-context".to_string(),
        ];
    }

    if lower.contains("notfound") || lower.contains("not found") {
        return vec!["Verify the resource name and namespace".to_string()];
    }

    if lower.contains("exceeded") {
        return vec!["Reduce --tail or narrow --since".to_string()];
    }

    Vec::new()
}
