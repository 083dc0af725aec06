//! Runtime configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `QIRT_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use qirt_hal::BackendConfig;
use serde::{Deserialize, Serialize};

use crate::error::{RuntimeError, RuntimeResult};

/// What to do when a scope ends with live handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeakPolicy {
    /// Say nothing.
    Ignore,
    /// Log the report at `warn` level.
    #[default]
    Warn,
    /// Return [`RuntimeError::Leaked`] from `Scope::finish`.
    Fail,
}

impl fmt::Display for LeakPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeakPolicy::Ignore => f.write_str("ignore"),
            LeakPolicy::Warn => f.write_str("warn"),
            LeakPolicy::Fail => f.write_str("fail"),
        }
    }
}

impl FromStr for LeakPolicy {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(LeakPolicy::Ignore),
            "warn" => Ok(LeakPolicy::Warn),
            "fail" => Ok(LeakPolicy::Fail),
            other => Err(RuntimeError::Config(format!(
                "unknown leak policy '{other}' (expected ignore, warn or fail)"
            ))),
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Record handles per scope and report leaks at teardown
    #[serde(default = "default_true")]
    pub track_allocations: bool,

    /// Reaction to leaked handles
    #[serde(default)]
    pub leak_policy: LeakPolicy,

    /// Release leaked handles through the backend at teardown
    #[serde(default)]
    pub release_on_teardown: bool,

    /// Registry name of the backend to run against
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Seed for backends that sample measurement outcomes
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_backend() -> String {
    "fullstate".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            track_allocations: true,
            leak_policy: LeakPolicy::default(),
            release_on_teardown: false,
            backend: default_backend(),
            seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml_str(contents: &str) -> RuntimeResult<Self> {
        let config: RuntimeConfig = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RuntimeResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration: file (or defaults), then environment overrides.
    pub fn load(config_file: Option<&Path>) -> RuntimeResult<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => RuntimeConfig::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override fields from `QIRT_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> RuntimeResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Override fields from any key lookup.
    ///
    /// Only keys that are present override; absent keys leave the field
    /// unchanged. Values that do not parse are rejected.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> RuntimeResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("QIRT_TRACK_ALLOCATIONS") {
            self.track_allocations = parse_bool("QIRT_TRACK_ALLOCATIONS", &v)?;
        }
        if let Some(v) = lookup("QIRT_LEAK_POLICY") {
            self.leak_policy = v.parse()?;
        }
        if let Some(v) = lookup("QIRT_RELEASE_ON_TEARDOWN") {
            self.release_on_teardown = parse_bool("QIRT_RELEASE_ON_TEARDOWN", &v)?;
        }
        if let Some(v) = lookup("QIRT_BACKEND") {
            self.backend = v;
        }
        if let Some(v) = lookup("QIRT_SEED") {
            let seed = v
                .parse()
                .map_err(|_| RuntimeError::Config(format!("QIRT_SEED: '{v}' is not a u64")))?;
            self.seed = Some(seed);
        }
        self.validate()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> RuntimeResult<()> {
        if self.backend.trim().is_empty() {
            return Err(RuntimeError::Config("backend name is empty".into()));
        }
        Ok(())
    }

    /// The backend selection to hand to a `BackendRegistry`.
    pub fn backend_config(&self) -> BackendConfig {
        let config = BackendConfig::new(self.backend.clone());
        match self.seed {
            Some(seed) => config.with_extra("seed", serde_json::json!(seed)),
            None => config,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> RuntimeResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RuntimeError::Config(format!(
            "{key}: '{value}' is not a boolean"
        ))),
    }
}
