//! Configuration loading for PharmaGuard.
//! Reads pharmaguard.toml (or .yaml) from the current directory or the path in
//! the PHARMAGUARD_CONFIG env var. A missing file means built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "PHARMAGUARD_CONFIG";
pub const API_URL_ENV: &str = "PHARMAGUARD_API_URL";
const DEFAULT_CONFIG_FILE: &str = "pharmaguard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location of the analysis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_analyze_path")]
    pub analyze_path: String,
    #[serde(default = "default_report_path")]
    pub report_path: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// Unset means no client-side timeout; analysis can take arbitrarily long.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url()     -> String { "http://localhost:8000".to_string() }
fn default_analyze_path() -> String { "/analyze/".to_string() }
fn default_report_path()  -> String { "/report/".to_string() }
fn default_health_path()  -> String { "/healthz".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            analyze_path: default_analyze_path(),
            report_path: default_report_path(),
            health_path: default_health_path(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_json_file_name")]
    pub json_file_name: String,
    #[serde(default = "default_pdf_file_name")]
    pub pdf_file_name: String,
}

fn default_output_dir()     -> PathBuf { PathBuf::from(".") }
fn default_json_file_name() -> String  { "pharmaguard_results.json".to_string() }
fn default_pdf_file_name()  -> String  { "clinical_report.pdf".to_string() }

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            json_file_name: default_json_file_name(),
            pdf_file_name: default_pdf_file_name(),
        }
    }
}

/// Cadence of the cosmetic progress display while an analysis is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,
    #[serde(default = "default_hint_interval_ms")]
    pub hint_interval_ms: u64,
}

fn default_step_interval_ms() -> u64 { 2500 }
fn default_hint_interval_ms() -> u64 { 1800 }

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: default_step_interval_ms(),
            hint_interval_ms: default_hint_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; RUST_LOG wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "pharmaguard=info,warn".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}


impl Config {
    /// Load configuration.
    /// Checks PHARMAGUARD_CONFIG env var first, then ./pharmaguard.toml.
    /// Environment overrides are applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            tracing::debug!(path = %path.display(), "No config file found, using defaults");
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config file; `.yaml`/`.yml` are read as YAML, anything else as TOML.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }
}
