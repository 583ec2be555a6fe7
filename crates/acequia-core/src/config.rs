use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AcequiaError, Result};
use crate::io;
use crate::permission::{PermissionRegistry, IRRIGATION_AGENT, KNOWN_AGENTS};
use crate::policy::IrrigationPolicy;
use crate::types::SensorSnapshot;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> u32 {
    1
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "qwen3:8b".to_string()
}

fn default_static_response() -> String {
    r#"{"action": "none"}"#.to_string()
}

fn default_timeout_seconds() -> u64 {
    crate::advisory::DEFAULT_TIMEOUT_SECS
}

fn default_temperature() -> f64 {
    25.0
}

fn default_humidity() -> f64 {
    60.0
}

fn default_soil_moisture() -> f64 {
    30.0
}

fn default_permissions() -> HashMap<String, bool> {
    KNOWN_AGENTS
        .iter()
        .map(|name| (name.to_string(), true))
        .collect()
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Which advisory backend the CLI wires in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// An Ollama-compatible generate endpoint.
    Ollama {
        #[serde(default = "default_endpoint")]
        endpoint: String,
        #[serde(default = "default_model")]
        model: String,
    },
    /// A canned reply, for dry runs and tests.
    Static {
        #[serde(default = "default_static_response")]
        response: String,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Ollama {
            endpoint: default_endpoint(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Bound on a single backend invocation, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Readings the stub sensor reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_humidity")]
    pub humidity: f64,
    #[serde(default = "default_soil_moisture")]
    pub soil_moisture: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            humidity: default_humidity(),
            soil_moisture: default_soil_moisture(),
        }
    }
}

impl SensorConfig {
    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot::new(self.temperature, self.humidity, self.soil_moisture)
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Root configuration, persisted as `acequia.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default)]
    pub policy: IrrigationPolicy,
    #[serde(default = "default_permissions")]
    pub permissions: HashMap<String, bool>,
    #[serde(default)]
    pub sensor: SensorConfig,
    /// JSONL cycle log; disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            backend: BackendConfig::default(),
            advisory: AdvisoryConfig::default(),
            policy: IrrigationPolicy::default(),
            permissions: default_permissions(),
            sensor: SensorConfig::default(),
            journal: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AcequiaError::ConfigNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&text)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_yaml::to_string(self)?;
        io::atomic_write(path, &text)
    }

    /// Registry built from the configured grants at startup.
    pub fn registry(&self) -> PermissionRegistry {
        PermissionRegistry::from_map(&self.permissions)
    }

    /// Sanity-check the configuration. Errors mean a run cannot work
    /// as intended; warnings flag values that are probably mistakes.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        match &self.backend {
            BackendConfig::Ollama { endpoint, model } => {
                if model.trim().is_empty() {
                    warnings.push(ConfigWarning::error("backend.model is empty"));
                }
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    warnings.push(ConfigWarning::warning(format!(
                        "backend.endpoint '{endpoint}' has no http(s) scheme"
                    )));
                }
            }
            BackendConfig::Static { response } => {
                if response.trim().is_empty() {
                    warnings.push(ConfigWarning::warning(
                        "backend.response is empty; every cycle will fall back to no-op",
                    ));
                }
            }
        }

        if self.advisory.timeout_seconds == 0 {
            warnings.push(ConfigWarning::error(
                "advisory.timeout_seconds is 0; every backend call will time out",
            ));
        }

        if self.policy.max_duration_minutes == 0 {
            warnings.push(ConfigWarning::warning(
                "policy.max_duration_minutes is 0; every irrigation run is clamped to nothing",
            ));
        } else if self.policy.max_duration_minutes > 24 * 60 {
            warnings.push(ConfigWarning::warning(format!(
                "policy.max_duration_minutes {} exceeds a full day",
                self.policy.max_duration_minutes
            )));
        }

        for name in self.permissions.keys() {
            if !KNOWN_AGENTS.contains(&name.as_str()) {
                warnings.push(ConfigWarning::warning(format!(
                    "permissions name unknown agent '{name}'"
                )));
            }
        }
        if !self.permissions.contains_key(IRRIGATION_AGENT) {
            warnings.push(ConfigWarning::warning(
                "permissions have no IrrigationAgent entry; actuation is denied by default",
            ));
        }

        if !(0.0..=100.0).contains(&self.sensor.soil_moisture) {
            warnings.push(ConfigWarning::warning(format!(
                "sensor.soil_moisture {} is outside 0-100",
                self.sensor.soil_moisture
            )));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Validation findings
// ---------------------------------------------------------------------------

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl fmt::Display for WarnLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarnLevel::Warning => write!(f, "warning"),
            WarnLevel::Error => write!(f, "error"),
        }
    }
}

/// One validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

impl ConfigWarning {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            message: message.into(),
        }
    }
}
