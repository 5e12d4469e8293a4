//! Application configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `NETLAB_*` environment variables (nested keys separated by `__`, e.g.
//! `NETLAB_NAMING__PROBE_ONLY`). Command-line flags are applied last by the CLI.

use config::{Config, Environment, File, Map};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::aggregator::LogNaming;
use crate::errors::{ReportError, ReportResult};
use crate::models::Scenario;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "netlab.toml";
pub const ENV_PREFIX: &str = "NETLAB";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the experiment logs
    pub log_dir: PathBuf,
    /// Host pair suffix used in log names, e.g. `h1_h20`
    pub host_pair: String,
    /// Scenarios in report order
    pub scenarios: Vec<Scenario>,
    pub naming: LogNaming,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("."),
            host_pair: "h1_h20".to_string(),
            scenarios: vec![
                Scenario::new("exp1", "Baseline (Exp1)"),
                Scenario::new("exp2", "High-load (Exp2)"),
                Scenario::new("exp3", "Delay (Exp3)"),
            ],
            naming: LogNaming::default(),
        }
    }
}

impl AppConfig {
    /// Loads the layered configuration
    ///
    /// An explicitly given file must exist; the default `netlab.toml` is optional.
    /// The result is not validated yet: call [`AppConfig::validate`] once the
    /// command-line overrides have been applied.
    pub fn load(path: Option<&Path>) -> ReportResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`AppConfig::load`], reading `NETLAB_*` variables from `env`
    /// instead of the process environment when given
    fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> ReportResult<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        debug!("Loading configuration from {} (required: {})", file.display(), required);

        let settings = Config::builder()
            .add_source(File::from(file.as_path()).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Applies command-line overrides, which take precedence over every other layer
    pub fn with_overrides(mut self, log_dir: Option<PathBuf>, host_pair: Option<String>) -> Self {
        if let Some(log_dir) = log_dir {
            self.log_dir = log_dir;
        }
        if let Some(host_pair) = host_pair {
            self.host_pair = host_pair;
        }
        self
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.scenarios.is_empty() {
            return Err(ReportError::InvalidConfig(
                "at least one scenario is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            if scenario.id.trim().is_empty() {
                return Err(ReportError::InvalidConfig(
                    "scenario id must not be empty".to_string(),
                ));
            }
            if !seen.insert(scenario.id.as_str()) {
                return Err(ReportError::InvalidConfig(format!(
                    "duplicate scenario id '{}'",
                    scenario.id
                )));
            }
        }

        if self.host_pair.trim().is_empty() {
            return Err(ReportError::InvalidConfig(
                "host_pair must not be empty".to_string(),
            ));
        }

        self.naming.validate()
    }
}
