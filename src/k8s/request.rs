//! Typed query requests consumed by the command builder

use std::fmt;

/// Default number of log lines requested from the end of a container log
pub const DEFAULT_TAIL: u32 = 100;

/// Default restart total a pod must exceed to count as restarting
pub const DEFAULT_RESTART_THRESHOLD: i64 = 5;

/// kubectl verb. Only read-only verbs exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Describe,
    Logs,
    Top,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Describe => "describe",
            Verb::Logs => "logs",
            Verb::Top => "top",
        }
    }
}

/// Resource kinds the inspector can query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Pod,
    Deployment,
    Service,
    ConfigMap,
    Secret,
    Ingress,
    PersistentVolumeClaim,
    Node,
    Event,
    Namespace,
    Metrics,
    Endpoints,
}

impl ResourceKind {
    /// Cluster-scoped kinds never receive a `-n` argument
    pub fn is_namespaced(&self) -> bool {
        !matches!(self, ResourceKind::Node | ResourceKind::Namespace)
    }

    /// Token used with `get` and `top`
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Pod | ResourceKind::Metrics => "pods",
            ResourceKind::Deployment => "deployments",
            ResourceKind::Service => "services",
            ResourceKind::ConfigMap => "configmaps",
            ResourceKind::Secret => "secrets",
            ResourceKind::Ingress => "ingresses",
            ResourceKind::PersistentVolumeClaim => "persistentvolumeclaims",
            ResourceKind::Node => "nodes",
            ResourceKind::Event => "events",
            ResourceKind::Namespace => "namespaces",
            ResourceKind::Endpoints => "endpoints",
        }
    }

    /// Token used with `describe`
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Pod | ResourceKind::Metrics => "pod",
            ResourceKind::Deployment => "deployment",
            ResourceKind::Service => "service",
            ResourceKind::ConfigMap => "configmap",
            ResourceKind::Secret => "secret",
            ResourceKind::Ingress => "ingress",
            ResourceKind::PersistentVolumeClaim => "pvc",
            ResourceKind::Node => "node",
            ResourceKind::Event => "event",
            ResourceKind::Namespace => "namespace",
            ResourceKind::Endpoints => "endpoints",
        }
    }

    /// Kinds accepted by `describe_resource`
    pub fn is_describable(&self) -> bool {
        !matches!(
            self,
            ResourceKind::Event | ResourceKind::Metrics | ResourceKind::Endpoints
        )
    }

    /// Parse the short names used by callers (`pod`, `svc`, `pvc`, ...)
    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "pod" | "pods" | "po" => ResourceKind::Pod,
            "deployment" | "deployments" | "deploy" => ResourceKind::Deployment,
            "service" | "services" | "svc" => ResourceKind::Service,
            "configmap" | "configmaps" | "cm" => ResourceKind::ConfigMap,
            "secret" | "secrets" => ResourceKind::Secret,
            "ingress" | "ingresses" | "ing" => ResourceKind::Ingress,
            "pvc" | "persistentvolumeclaim" | "persistentvolumeclaims" => {
                ResourceKind::PersistentVolumeClaim
            }
            "node" | "nodes" | "no" => ResourceKind::Node,
            "event" | "events" | "ev" => ResourceKind::Event,
            "namespace" | "namespaces" | "ns" => ResourceKind::Namespace,
            "metrics" => ResourceKind::Metrics,
            "endpoints" | "ep" => ResourceKind::Endpoints,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// Which objects of a kind a request addresses
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
    /// Every object in the namespace
    #[default]
    All,
    /// Exactly one object, by name
    ByName(String),
    /// Objects matching a label selector expression, e.g. `app=web`
    BySelector(String),
}

impl Target {
    /// Resolve a single free-text field the way the `app_status` tool always has:
    /// `*` or `all` lists everything, text containing `-` is taken as a pod
    /// name, anything else as the value of the `app` label.
    ///
    /// This is a heuristic. Label values containing `-` are misread as names;
    /// callers that know what they hold should build the variant directly.
    pub fn infer(text: &str) -> Self {
        if text == "*" || text == "all" {
            Target::All
        } else if text.contains('-') {
            Target::ByName(text.to_string())
        } else {
            Target::BySelector(format!("app={}", text))
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::All => f.write_str("*"),
            Target::ByName(name) => f.write_str(name),
            Target::BySelector(selector) => f.write_str(selector),
        }
    }
}

/// `-o` output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Wide,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Wide => "wide",
        }
    }
}

/// Pod phase filters the API server evaluates via `--field-selector`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseFilter {
    /// Neither Running nor Succeeded
    Failed,
    Pending,
}

impl PhaseFilter {
    pub fn field_selector(&self) -> &'static str {
        match self {
            PhaseFilter::Failed => "status.phase!=Running,status.phase!=Succeeded",
            PhaseFilter::Pending => "status.phase=Pending",
        }
    }
}

/// Event type, matched exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Normal,
    Warning,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Normal => "Normal",
            EventType::Warning => "Warning",
        }
    }
}

/// Options for `kubectl logs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub tail: u32,
    pub previous: bool,
    pub container: Option<String>,
    pub since: Option<String>,
    pub timestamps: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            tail: DEFAULT_TAIL,
            previous: false,
            container: None,
            since: None,
            timestamps: false,
        }
    }
}

/// A single read-only query, prior to argument construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub verb: Verb,
    pub kind: ResourceKind,
    pub namespace: Option<String>,
    pub target: Target,
    pub output: Option<OutputFormat>,
    pub phase: Option<PhaseFilter>,
    /// JSONPath expression passed to `--sort-by`
    pub sort_by: Option<&'static str>,
    pub logs: Option<LogOptions>,
}

impl QueryRequest {
    pub fn new(verb: Verb, kind: ResourceKind) -> Self {
        Self {
            verb,
            kind,
            namespace: None,
            target: Target::All,
            output: None,
            phase: None,
            sort_by: None,
            logs: None,
        }
    }

    pub fn get(kind: ResourceKind) -> Self {
        Self::new(Verb::Get, kind)
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn named(self, name: impl Into<String>) -> Self {
        self.target(Target::ByName(name.into()))
    }

    pub fn output(mut self, output: OutputFormat) -> Self {
        self.output = Some(output);
        self
    }

    pub fn json(self) -> Self {
        self.output(OutputFormat::Json)
    }

    pub fn phase(mut self, phase: PhaseFilter) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn sort_by(mut self, expr: &'static str) -> Self {
        self.sort_by = Some(expr);
        self
    }

    pub fn log_options(mut self, options: LogOptions) -> Self {
        self.logs = Some(options);
        self
    }
}
