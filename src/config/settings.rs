//! Configuration file support for k8s-inspect

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::k8s::kubectl::Kubectl;
use crate::k8s::request::{DEFAULT_RESTART_THRESHOLD, DEFAULT_TAIL};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub kubectl: KubectlSettings,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub output: OutputSettings,
}

/// How kubectl is invoked
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct KubectlSettings {
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Exported as `KUBECONFIG` for every invocation when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,

    /// Lower bound on the 5 MiB output limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_bytes: Option<usize>,

    /// Wall-clock limit per invocation. Unset means no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Default values for common options
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Defaults {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_log_tail")]
    pub log_tail: u32,

    #[serde(default = "default_restart_threshold")]
    pub restart_threshold: i64,
}

/// Envelope rendering
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputStyle,

    #[serde(default = "default_true")]
    pub colors: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Json,
    Yaml,
}

// Default value functions
fn default_binary() -> String {
    "kubectl".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_log_tail() -> u32 {
    DEFAULT_TAIL
}

fn default_restart_threshold() -> i64 {
    DEFAULT_RESTART_THRESHOLD
}

fn default_true() -> bool {
    true
}

impl Default for KubectlSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            kubeconfig: None,
            max_output_bytes: None,
            timeout_secs: None,
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            log_tail: default_log_tail(),
            restart_threshold: default_restart_threshold(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputStyle::default(),
            colors: default_true(),
        }
    }
}

impl KubectlSettings {
    /// Executor configured from these settings
    pub fn executor(&self) -> Kubectl {
        Kubectl::new(&self.binary)
            .with_kubeconfig(self.kubeconfig.as_deref())
            .with_max_output_bytes(self.max_output_bytes)
            .with_timeout(self.timeout_secs.map(Duration::from_secs))
    }
}

impl Settings {
    /// Load settings from `explicit`, else from the first config file found,
    /// else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit.map(Path::to_path_buf).or_else(Self::find_config_file) {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Find config file in standard locations
    /// Priority:
    /// 1. .k8s-inspect.toml in current directory
    /// 2. ~/.config/k8s-inspect/config.toml (XDG config directory)
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(".k8s-inspect.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("k8s-inspect").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Save settings to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example config file content
    pub fn example_config() -> String {
        r#"# k8s-inspect configuration file
# Place this file at ~/.config/k8s-inspect/config.toml or .k8s-inspect.toml in your project

[kubectl]
binary = "kubectl"
# kubeconfig = "/path/to/kubeconfig"  # Optional: exported as KUBECONFIG for every call
# max_output_bytes = 1048576  # Optional: lower the 5 MiB output limit
# timeout_secs = 30  # Optional: kill kubectl after this many seconds

[defaults]
namespace = "default"
log_tail = 100
restart_threshold = 5

[output]
format = "json"  # Options: json, yaml
colors = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.kubectl.binary, "kubectl");
        assert_eq!(settings.defaults.namespace, "default");
        assert_eq!(settings.defaults.log_tail, 100);
        assert_eq!(settings.defaults.restart_threshold, 5);
        assert_eq!(settings.output.format, OutputStyle::Json);
        assert!(settings.output.colors);
    }

    #[test]
    fn test_settings_deserialization() {
        let toml_str = r#"
[kubectl]
binary = "/usr/local/bin/kubectl"
timeout_secs = 30

[defaults]
namespace = "shop"

[output]
format = "yaml"
colors = false
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.kubectl.binary, "/usr/local/bin/kubectl");
        assert_eq!(settings.kubectl.timeout_secs, Some(30));
        assert!(settings.kubectl.kubeconfig.is_none());
        assert_eq!(settings.defaults.namespace, "shop");
        assert_eq!(settings.defaults.log_tail, 100);
        assert_eq!(settings.output.format, OutputStyle::Yaml);
        assert!(!settings.output.colors);
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let example = Settings::example_config();
        assert!(example.contains("k8s-inspect configuration"));

        let settings: Settings = toml::from_str(&example).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.kubectl.kubeconfig = Some("/tmp/kind.kubeconfig".to_string());
        settings.defaults.restart_threshold = 10;
        settings.save(&path).unwrap();

        let loaded = Settings::load(Some(&path)).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults]\nlog_tail = \"many\"\n").unwrap();

        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_executor_from_settings() {
        let settings = KubectlSettings {
            binary: "/opt/kubectl".to_string(),
            ..KubectlSettings::default()
        };
        assert_eq!(settings.executor().binary(), Path::new("/opt/kubectl"));
    }
}
