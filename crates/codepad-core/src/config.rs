//! Playground configuration with YAML loading and environment overlay
//!
//! Configuration is layered: an optional YAML file provides the base, then
//! environment variables overlay it. The remote judge section is optional;
//! when absent, non-JavaScript single-file runs fall back to the predictive
//! simulator.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::errors::PlaygroundError;

/// Environment variables recognized by the overlay, matching the names the
/// original deployment used.
pub const JUDGE_API_KEY_VAR: &str = "JUDGE0_API_KEY";
pub const JUDGE_API_HOST_VAR: &str = "JUDGE0_API_HOST";
pub const SIMULATOR_API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlaygroundConfig {
    #[serde(default)]
    pub remote: Option<RemoteJudgeConfig>,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

/// Credentials and pacing for the remote judge service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteJudgeConfig {
    pub api_host: String,
    pub api_key: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Upper bound on status polls per submission. `null` disables the bound
    /// and restores unbounded polling.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: Option<u32>,
}

impl RemoteJudgeConfig {
    pub fn new(api_host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            api_key: api_key.into(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_simulator_model")]
    pub model: String,
    /// When set, simulated runs stream predicted output chunk by chunk
    /// instead of returning one completed string.
    #[serde(default)]
    pub streaming: bool,
    #[serde(default)]
    pub api_base: Option<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_simulator_model(),
            streaming: false,
            api_base: None,
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_poll_attempts() -> Option<u32> {
    Some(60)
}

fn default_simulator_model() -> String {
    "gemini-pro".to_string()
}

impl PlaygroundConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PlaygroundError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlaygroundError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            PlaygroundError::Configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Build a configuration from the environment alone.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.overlay_env();
        config
    }

    /// Resolve the effective configuration: the file if it exists, then the
    /// environment overlaid on top.
    pub fn resolve<P: AsRef<Path>>(path: Option<P>) -> Result<Self, PlaygroundError> {
        let mut config = match path {
            Some(path) if path.as_ref().exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        config.overlay_env();
        Ok(config)
    }

    fn overlay_env(&mut self) {
        if let (Ok(api_key), Ok(api_host)) =
            (env::var(JUDGE_API_KEY_VAR), env::var(JUDGE_API_HOST_VAR))
        {
            if !api_key.is_empty() && !api_host.is_empty() {
                match &mut self.remote {
                    Some(remote) => {
                        remote.api_key = api_key;
                        remote.api_host = api_host;
                    }
                    None => self.remote = Some(RemoteJudgeConfig::new(api_host, api_key)),
                }
            }
        }

        if let Ok(api_key) = env::var(SIMULATOR_API_KEY_VAR) {
            if !api_key.is_empty() {
                self.simulator.api_key = Some(api_key);
            }
        }
    }

    /// Whether remote execution credentials are configured.
    pub fn has_remote(&self) -> bool {
        self.remote
            .as_ref()
            .map(|r| !r.api_key.is_empty() && !r.api_host.is_empty())
            .unwrap_or(false)
    }
}
