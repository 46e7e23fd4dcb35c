//! Argument-vector construction for kubectl invocations
//!
//! Every value a caller supplies lands in exactly one argument slot. Nothing
//! here produces a shell string; [`CommandSpec::display`] quotes the vector
//! for logs only.

use std::sync::OnceLock;

use regex::Regex;

use crate::k8s::request::{QueryRequest, ResourceKind, Target, Verb};
use crate::utils::errors::{InspectError, Result};

/// Default bound on captured stdout
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 5 * 1024 * 1024;

/// Immutable argument vector plus execution limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    args: Vec<String>,
    max_output_bytes: usize,
}

impl CommandSpec {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn max_output_bytes(&self) -> usize {
        self.max_output_bytes
    }

    /// Shell-quoted rendering, for logging only
    pub fn display(&self) -> String {
        shell_words::join(&self.args)
    }

    /// `kubectl cluster-info`
    pub fn cluster_info() -> Self {
        CommandBuilder::new("cluster-info").build()
    }
}

/// Accumulates argument tokens. Absent options add nothing.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    args: Vec<String>,
    max_output_bytes: usize,
}

impl CommandBuilder {
    pub fn new(verb: &str) -> Self {
        Self {
            args: vec![verb.to_string()],
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn arg_if(self, condition: bool, arg: impl Into<String>) -> Self {
        if condition { self.arg(arg) } else { self }
    }

    /// Flag followed by its value in a separate slot, e.g. `-n <namespace>`
    pub fn pair(self, flag: &str, value: impl Into<String>) -> Self {
        self.arg(flag).arg(value)
    }

    pub fn pair_opt(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.pair(flag, v),
            None => self,
        }
    }

    /// `--flag=value` as one slot
    pub fn assign(self, flag: &str, value: impl std::fmt::Display) -> Self {
        let token = format!("{}={}", flag, value);
        self.arg(token)
    }

    pub fn assign_opt(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.assign(flag, v),
            None => self,
        }
    }

    pub fn max_output_bytes(mut self, limit: usize) -> Self {
        self.max_output_bytes = limit;
        self
    }

    pub fn build(self) -> CommandSpec {
        CommandSpec {
            args: self.args,
            max_output_bytes: self.max_output_bytes,
        }
    }
}

/// Turn a request into a command, or reject it before anything is spawned
pub fn build(request: &QueryRequest) -> Result<CommandSpec> {
    check_verb_kind(request)?;

    let namespace = resolve_namespace(request)?;
    let mut builder = CommandBuilder::new(request.verb.as_str());

    match request.verb {
        Verb::Logs => {
            let pod = required_name(request)?;
            builder = builder.arg(pod);
        }
        Verb::Describe => {
            let name = required_name(request)?;
            builder = builder.arg(request.kind.singular()).arg(name);
        }
        Verb::Get | Verb::Top => {
            builder = builder.arg(request.kind.plural());
            if let Target::ByName(name) = &request.target {
                builder = builder.arg(token("name", name)?);
            }
        }
    }

    builder = builder.pair_opt("-n", namespace);

    if let Some(output) = request.output {
        builder = builder.pair("-o", output.as_str());
    }

    if let Target::BySelector(selector) = &request.target {
        if request.verb != Verb::Get {
            return Err(InspectError::invalid(format!(
                "label selectors are not supported for '{}'",
                request.verb.as_str()
            )));
        }
        builder = builder.pair("-l", token("label selector", selector)?);
    }

    if let Some(phase) = request.phase {
        builder = builder.assign("--field-selector", phase.field_selector());
    }

    builder = builder.assign_opt("--sort-by", request.sort_by);

    if let Some(options) = &request.logs {
        if request.verb != Verb::Logs {
            return Err(InspectError::invalid("log options only apply to 'logs'"));
        }
        if options.tail == 0 {
            return Err(InspectError::invalid("tail must be at least 1"));
        }

        let container = options
            .container
            .as_deref()
            .map(|c| token("container", c))
            .transpose()?;
        let since = options.since.as_deref().map(duration).transpose()?;

        builder = builder
            .assign("--tail", options.tail)
            .arg_if(options.previous, "--previous")
            .pair_opt("-c", container)
            .assign_opt("--since", since)
            .arg_if(options.timestamps, "--timestamps");
    }

    Ok(builder.build())
}

fn check_verb_kind(request: &QueryRequest) -> Result<()> {
    let allowed = match request.verb {
        Verb::Get => request.kind != ResourceKind::Metrics,
        Verb::Describe => request.kind.is_describable(),
        Verb::Logs => request.kind == ResourceKind::Pod,
        Verb::Top => request.kind == ResourceKind::Metrics,
    };

    if allowed {
        Ok(())
    } else {
        Err(InspectError::invalid(format!(
            "'{}' is not supported for {}",
            request.verb.as_str(),
            request.kind
        )))
    }
}

/// Namespace-scoped kinds require one; cluster-scoped kinds drop it.
fn resolve_namespace(request: &QueryRequest) -> Result<Option<&str>> {
    if !request.kind.is_namespaced() {
        return Ok(None);
    }

    match request.namespace.as_deref() {
        Some(ns) if !ns.trim().is_empty() => token("namespace", ns).map(Some),
        _ => Err(InspectError::invalid(format!(
            "namespace is required for {}",
            request.kind.plural()
        ))),
    }
}

fn required_name(request: &QueryRequest) -> Result<&str> {
    match &request.target {
        Target::ByName(name) => token("name", name),
        _ => Err(InspectError::invalid(format!(
            "'{}' requires an exact {} name",
            request.verb.as_str(),
            request.kind
        ))),
    }
}

/// A caller-supplied value must be non-empty and must not parse as a flag.
fn token<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(InspectError::invalid(format!("{} must not be empty", field)));
    }
    if value.starts_with('-') {
        return Err(InspectError::invalid(format!(
            "{} must not start with '-': {}",
            field, value
        )));
    }
    Ok(value)
}

fn duration(value: &str) -> Result<&str> {
    static DURATION: OnceLock<Regex> = OnceLock::new();
    let re = DURATION.get_or_init(|| {
        Regex::new(r"^(0|([0-9]+(\.[0-9]+)?(ns|us|µs|ms|s|m|h))+)$").expect("valid duration regex")
    });

    if re.is_match(value) {
        Ok(value)
    } else {
        Err(InspectError::invalid(format!(
            "since must be a duration such as 5m or 1h30m, got '{}'",
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::request::{LogOptions, OutputFormat, PhaseFilter};

    fn args(spec: &CommandSpec) -> Vec<&str> {
        spec.args().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_namespace_required_for_namespaced_kinds() {
        for kind in [
            ResourceKind::Pod,
            ResourceKind::Deployment,
            ResourceKind::Service,
            ResourceKind::ConfigMap,
            ResourceKind::Ingress,
            ResourceKind::Event,
            ResourceKind::Endpoints,
        ] {
            let err = build(&QueryRequest::get(kind).json()).unwrap_err();
            assert!(matches!(err, InspectError::InvalidRequest(_)), "{kind}");

            let err = build(&QueryRequest::get(kind).in_namespace("  ").json()).unwrap_err();
            assert!(matches!(err, InspectError::InvalidRequest(_)), "{kind}");
        }
    }

    #[test]
    fn test_cluster_scoped_ignores_namespace() {
        let spec = build(&QueryRequest::get(ResourceKind::Node).in_namespace("default").json())
            .unwrap();
        assert_eq!(args(&spec), ["get", "nodes", "-o", "json"]);
    }

    #[test]
    fn test_pod_target_variants() {
        let all = build(
            &QueryRequest::get(ResourceKind::Pod)
                .in_namespace("shop")
                .target(Target::infer("*"))
                .output(OutputFormat::Wide),
        )
        .unwrap();
        assert_eq!(args(&all), ["get", "pods", "-n", "shop", "-o", "wide"]);

        let named = build(
            &QueryRequest::get(ResourceKind::Pod)
                .in_namespace("shop")
                .target(Target::infer("web-7f9c6-abcde"))
                .output(OutputFormat::Wide),
        )
        .unwrap();
        assert_eq!(
            args(&named),
            ["get", "pods", "web-7f9c6-abcde", "-n", "shop", "-o", "wide"]
        );

        let labelled = build(
            &QueryRequest::get(ResourceKind::Pod)
                .in_namespace("shop")
                .target(Target::infer("web"))
                .output(OutputFormat::Wide),
        )
        .unwrap();
        assert_eq!(
            args(&labelled),
            ["get", "pods", "-n", "shop", "-o", "wide", "-l", "app=web"]
        );
    }

    #[test]
    fn test_values_occupy_one_slot() {
        let hostile = "prod; rm -rf / && echo $(id)";
        let spec = build(
            &QueryRequest::get(ResourceKind::Deployment)
                .in_namespace(hostile)
                .target(Target::BySelector("app=web, tier in (a b)".to_string()))
                .json(),
        )
        .unwrap();

        assert_eq!(spec.args().len(), 8);
        assert_eq!(spec.args()[3], hostile);
        assert_eq!(spec.args()[7], "app=web, tier in (a b)");
    }

    #[test]
    fn test_flag_like_values_rejected() {
        let err = build(
            &QueryRequest::get(ResourceKind::Service)
                .in_namespace("default")
                .named("--kubeconfig=/tmp/evil"),
        )
        .unwrap_err();
        assert!(matches!(err, InspectError::InvalidRequest(_)));

        let err = build(&QueryRequest::get(ResourceKind::Service).in_namespace("-A")).unwrap_err();
        assert!(matches!(err, InspectError::InvalidRequest(_)));
    }

    #[test]
    fn test_logs_full_options() {
        let spec = build(
            &QueryRequest::new(Verb::Logs, ResourceKind::Pod)
                .in_namespace("shop")
                .named("web-1")
                .log_options(LogOptions {
                    tail: 50,
                    previous: true,
                    container: Some("app".to_string()),
                    since: Some("1h30m".to_string()),
                    timestamps: true,
                }),
        )
        .unwrap();

        assert_eq!(
            args(&spec),
            [
                "logs",
                "web-1",
                "-n",
                "shop",
                "--tail=50",
                "--previous",
                "-c",
                "app",
                "--since=1h30m",
                "--timestamps"
            ]
        );
        assert_eq!(spec.max_output_bytes(), DEFAULT_MAX_OUTPUT_BYTES);
    }

    #[test]
    fn test_logs_absent_options_emit_nothing() {
        let spec = build(
            &QueryRequest::new(Verb::Logs, ResourceKind::Pod)
                .in_namespace("shop")
                .named("web-1")
                .log_options(LogOptions::default()),
        )
        .unwrap();

        assert_eq!(args(&spec), ["logs", "web-1", "-n", "shop", "--tail=100"]);
        assert!(spec.args().iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn test_logs_validation() {
        let base = QueryRequest::new(Verb::Logs, ResourceKind::Pod).in_namespace("shop");

        assert!(build(&base.clone()).is_err(), "pod name is required");

        let zero_tail = base.clone().named("web-1").log_options(LogOptions {
            tail: 0,
            ..LogOptions::default()
        });
        assert!(build(&zero_tail).is_err());

        let bad_since = base.named("web-1").log_options(LogOptions {
            since: Some("2d".to_string()),
            ..LogOptions::default()
        });
        assert!(build(&bad_since).is_err());
    }

    #[test]
    fn test_since_accepts_go_durations() {
        for since in ["0", "30s", "1h30m", "1.5h", "250ms"] {
            let request = QueryRequest::new(Verb::Logs, ResourceKind::Pod)
                .in_namespace("shop")
                .named("web-1")
                .log_options(LogOptions {
                    since: Some(since.to_string()),
                    ..LogOptions::default()
                });
            assert!(build(&request).is_ok(), "{} should be accepted", since);
        }

        for since in ["00", "0x", "m5", "-5m"] {
            assert!(duration(since).is_err(), "{} should be rejected", since);
        }
    }

    #[test]
    fn test_describe() {
        let node = build(
            &QueryRequest::new(Verb::Describe, ResourceKind::Node)
                .in_namespace("default")
                .named("worker-1"),
        )
        .unwrap();
        assert_eq!(args(&node), ["describe", "node", "worker-1"]);

        let pvc = build(
            &QueryRequest::new(Verb::Describe, ResourceKind::PersistentVolumeClaim)
                .in_namespace("data")
                .named("pg-data"),
        )
        .unwrap();
        assert_eq!(args(&pvc), ["describe", "pvc", "pg-data", "-n", "data"]);

        let events = QueryRequest::new(Verb::Describe, ResourceKind::Event)
            .in_namespace("data")
            .named("x");
        assert!(build(&events).is_err());
    }

    #[test]
    fn test_phase_and_sort() {
        let failed = build(
            &QueryRequest::get(ResourceKind::Pod)
                .in_namespace("shop")
                .json()
                .phase(PhaseFilter::Failed),
        )
        .unwrap();
        assert_eq!(
            args(&failed),
            [
                "get",
                "pods",
                "-n",
                "shop",
                "-o",
                "json",
                "--field-selector=status.phase!=Running,status.phase!=Succeeded"
            ]
        );

        let events = build(
            &QueryRequest::get(ResourceKind::Event)
                .in_namespace("shop")
                .json()
                .sort_by(".lastTimestamp"),
        )
        .unwrap();
        assert_eq!(events.args().last().unwrap(), "--sort-by=.lastTimestamp");
    }

    #[test]
    fn test_top_pods() {
        let spec = build(
            &QueryRequest::new(Verb::Top, ResourceKind::Metrics)
                .in_namespace("shop")
                .named("web-1"),
        )
        .unwrap();
        assert_eq!(args(&spec), ["top", "pods", "web-1", "-n", "shop"]);

        assert!(build(&QueryRequest::get(ResourceKind::Metrics).in_namespace("shop")).is_err());
    }

    #[test]
    fn test_cluster_info_and_display() {
        let spec = CommandSpec::cluster_info();
        assert_eq!(spec.args(), ["cluster-info"]);

        let spec = CommandBuilder::new("get")
            .arg("pods")
            .pair("-l", "app=web shop")
            .build();
        assert_eq!(spec.display(), "get pods -l 'app=web shop'");
    }
}
