//! k8s-inspect CLI - read-only Kubernetes inspection

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use colored::Colorize;
use k8s_inspect::config::{OutputStyle, Settings};
use k8s_inspect::k8s::request::{EventType, LogOptions, ResourceKind, Target};
use k8s_inspect::utils::{CommonPrereqs, Prerequisite};
use k8s_inspect::{Envelope, InspectError, Inspector, Kubectl, log_error, log_info};
use serde::Serialize;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "k8s-inspect")]
#[command(author, version, about = "Read-only Kubernetes inspection through kubectl", long_about = None)]
struct Cli {
    /// Verbose output (can be used multiple times: -v, -vv, -vvv)
    /// -v: INFO, -vv: DEBUG, -vvv: TRACE
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Namespace to query (defaults to [defaults].namespace)
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Path to kubeconfig file
    #[arg(long, global = true, env = "KUBECONFIG")]
    kubeconfig: Option<String>,

    /// kubectl binary to invoke
    #[arg(long, global = true)]
    kubectl: Option<String>,

    /// Output format for the result envelope
    #[arg(short, long, global = true, value_enum)]
    output: Option<OutputStyle>,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pods of an application and describe each one
    AppStatus {
        /// App label value, pod name, or `*` for every pod
        #[arg(conflicts_with_all = ["pod", "selector"])]
        app: Option<String>,

        /// Exact pod name
        #[arg(long, conflicts_with = "selector")]
        pod: Option<String>,

        /// Label selector, e.g. app=web,tier=frontend
        #[arg(short = 'l', long)]
        selector: Option<String>,
    },

    /// Show the tail of a pod's log
    Logs {
        /// Pod name
        pod: String,

        /// Number of lines from the end (defaults to [defaults].log_tail)
        #[arg(long)]
        tail: Option<u32>,

        /// Previous container instance
        #[arg(short, long)]
        previous: bool,

        /// Container name
        #[arg(short, long)]
        container: Option<String>,

        /// Only lines newer than this duration, e.g. 5m or 1h30m
        #[arg(long)]
        since: Option<String>,

        /// Prefix each line with its timestamp
        #[arg(long)]
        timestamps: bool,
    },

    /// List deployments
    Deployments {
        /// Label selector
        #[arg(short = 'l', long)]
        selector: Option<String>,
    },

    /// List services
    Services {
        /// Service name
        name: Option<String>,
    },

    /// List events, most recent first
    Events {
        /// Keep events whose object name contains this text
        #[arg(long)]
        resource: Option<String>,

        /// Event type
        #[arg(long = "type", value_enum)]
        event_type: Option<EventTypeArg>,
    },

    /// Describe a resource
    Describe {
        /// pod, deployment, service, configmap, secret, ingress, pvc, node or namespace
        kind: String,

        /// Resource name
        name: String,
    },

    /// List configmaps
    Configmaps {
        /// ConfigMap name
        name: Option<String>,
    },

    /// List ingresses
    Ingresses {
        /// Keep ingresses with a rule for this host
        #[arg(long)]
        host: Option<String>,
    },

    /// Pod CPU and memory usage (requires metrics-server)
    Top {
        /// Pod name
        pod: Option<String>,
    },

    /// List namespaces
    Namespaces,

    /// Show cluster endpoints
    ClusterInfo,

    /// List nodes
    Nodes,

    /// Pods that are neither Running nor Succeeded
    FailedPods,

    /// Pods waiting to be scheduled or started
    PendingPods,

    /// Pods restarting more than a threshold
    RestartingPods {
        /// Restart total a pod must exceed (defaults to [defaults].restart_threshold)
        #[arg(long)]
        threshold: Option<i64>,
    },

    /// Show a service with its endpoints
    Endpoints {
        /// Service name
        service: String,
    },

    /// Check prerequisites
    Check,

    /// Print an example config file, or write the defaults to a path
    Config {
        /// Write the default configuration to this file
        #[arg(long)]
        write: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum EventTypeArg {
    Normal,
    Warning,
}

impl From<EventTypeArg> for EventType {
    fn from(arg: EventTypeArg) -> Self {
        match arg {
            EventTypeArg::Normal => EventType::Normal,
            EventTypeArg::Warning => EventType::Warning,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    k8s_inspect::utils::logger::init(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(kubeconfig) = cli.kubeconfig {
        settings.kubectl.kubeconfig = Some(kubeconfig);
    }
    if let Some(kubectl) = cli.kubectl {
        settings.kubectl.binary = kubectl;
    }
    if let Some(output) = cli.output {
        settings.output.format = output;
    }
    if let Some(namespace) = cli.namespace {
        settings.defaults.namespace = namespace;
    }
    if !settings.output.colors {
        colored::control::set_override(false);
    }

    let inspector = Inspector::new(settings.kubectl.executor());
    let ns = settings.defaults.namespace.as_str();

    let success = match cli.command {
        Commands::AppStatus { app, pod, selector } => {
            let (app, target) = match (app, pod, selector) {
                (_, Some(pod), _) => (pod.clone(), Target::ByName(pod)),
                (_, _, Some(selector)) => (selector.clone(), Target::BySelector(selector)),
                (Some(app), _, _) => {
                    let target = Target::infer(&app);
                    (app, target)
                }
                _ => ("*".to_string(), Target::All),
            };
            emit(inspector.app_status(ns, &app, target).await, &settings)?
        }
        Commands::Logs {
            pod,
            tail,
            previous,
            container,
            since,
            timestamps,
        } => {
            let options = LogOptions {
                tail: tail.unwrap_or(settings.defaults.log_tail),
                previous,
                container,
                since,
                timestamps,
            };
            emit(inspector.pod_logs(ns, &pod, options).await, &settings)?
        }
        Commands::Deployments { selector } => {
            emit(inspector.get_deployments(ns, selector.as_deref()).await, &settings)?
        }
        Commands::Services { name } => {
            emit(inspector.get_services(ns, name.as_deref()).await, &settings)?
        }
        Commands::Events {
            resource,
            event_type,
        } => {
            let envelope = inspector
                .get_events(ns, resource.as_deref(), event_type.map(EventType::from))
                .await;
            emit(envelope, &settings)?
        }
        Commands::Describe { kind, name } => {
            handle_describe(&inspector, ns, &kind, &name, &settings).await?
        }
        Commands::Configmaps { name } => {
            emit(inspector.get_configmaps(ns, name.as_deref()).await, &settings)?
        }
        Commands::Ingresses { host } => {
            emit(inspector.get_ingresses(ns, host.as_deref()).await, &settings)?
        }
        Commands::Top { pod } => {
            emit(inspector.get_resource_usage(ns, pod.as_deref()).await, &settings)?
        }
        Commands::Namespaces => emit(inspector.list_namespaces().await, &settings)?,
        Commands::ClusterInfo => emit(inspector.get_cluster_info().await, &settings)?,
        Commands::Nodes => emit(inspector.get_nodes().await, &settings)?,
        Commands::FailedPods => emit(inspector.get_failed_pods(ns).await, &settings)?,
        Commands::PendingPods => emit(inspector.get_pending_pods(ns).await, &settings)?,
        Commands::RestartingPods { threshold } => {
            let threshold = threshold.unwrap_or(settings.defaults.restart_threshold);
            emit(inspector.get_restarting_pods(ns, threshold).await, &settings)?
        }
        Commands::Endpoints { service } => {
            emit(inspector.get_service_endpoints(ns, &service).await, &settings)?
        }
        Commands::Check => handle_check_command(&settings),
        Commands::Config { write } => handle_config_command(write)?,
        Commands::Completion { shell } => handle_completion_command(shell),
        Commands::Version => handle_version_command(),
    };

    if !success {
        std::process::exit(1);
    }

    Ok(())
}

/// Print the envelope on stdout and suggestions on stderr.
/// Returns whether the operation succeeded.
fn emit<T: Serialize>(envelope: Envelope<T>, settings: &Settings) -> Result<bool> {
    let rendered = match settings.output.format {
        OutputStyle::Json => serde_json::to_string_pretty(&envelope).context("Failed to render JSON")?,
        OutputStyle::Yaml => serde_yaml::to_string(&envelope).context("Failed to render YAML")?,
    };
    println!("{}", rendered.trim_end());

    match envelope.error() {
        Some(err) => {
            err.display();
            Ok(false)
        }
        None => Ok(true),
    }
}

async fn handle_describe(
    inspector: &Inspector<Kubectl>,
    namespace: &str,
    kind: &str,
    name: &str,
    settings: &Settings,
) -> Result<bool> {
    match ResourceKind::parse(kind) {
        Some(kind) => emit(inspector.describe_resource(namespace, kind, name).await, settings),
        None => {
            let err = InspectError::invalid(format!("unknown resource type '{}'", kind));
            emit(Envelope::<()>::from(err), settings)
        }
    }
}

fn handle_check_command(settings: &Settings) -> bool {
    log_info!("Checking prerequisites...");

    let kubectl = CommonPrereqs::kubectl(&settings.kubectl.binary);
    let prereqs: Vec<&dyn Prerequisite> = vec![&kubectl];

    let (found, missing) = CommonPrereqs::check_all(&prereqs);
    for name in &found {
        println!("{} {}", "✓".green(), name);
    }
    for (name, hint) in &missing {
        println!("{} {} - {}", "✗".red(), name, hint);
        log_error!("Missing prerequisite: {}", name);
    }

    missing.is_empty()
}

fn handle_config_command(write: Option<PathBuf>) -> Result<bool> {
    match write {
        Some(path) => {
            Settings::default().save(&path)?;
            log_info!("Wrote default configuration to {}", path.display());
        }
        None => print!("{}", Settings::example_config()),
    }
    Ok(true)
}

fn handle_completion_command(shell: Shell) -> bool {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "k8s-inspect", &mut io::stdout());
    true
}

fn handle_version_command() -> bool {
    println!("k8s-inspect {}", env!("CARGO_PKG_VERSION"));
    println!("Read-only Kubernetes inspection through kubectl");
    true
}
