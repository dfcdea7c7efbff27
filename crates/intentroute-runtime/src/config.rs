//! Runtime settings.
//!
//! Every field is optional. A missing file means the built-in provider
//! catalog is used as is; a file may override timeouts, the output
//! directory, and per-provider model, budget, endpoint or key variable.
//!
//! ```yaml
//! request_timeout: 30s
//! results_dir: evaluation/results
//! providers:
//!   google:
//!     requests_per_minute: 5
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use intentroute_core::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::providers::ApiCredential;

/// Errors loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings shared by the router, the evaluator and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Upper bound on a single remote call
    #[serde(with = "duration_human")]
    pub request_timeout: Duration,

    /// Completion cap for chat-completion providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Where evaluation records are written
    pub results_dir: PathBuf,

    /// Per-provider overrides of the built-in catalog
    pub providers: BTreeMap<ProviderKind, ProviderOverrides>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_tokens: None,
            results_dir: PathBuf::from("evaluation/results"),
            providers: BTreeMap::new(),
        }
    }
}

/// Fields of a [`ProviderConfig`] that a settings file may replace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_per_minute: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

/// Whether a provider's credential is present in the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAvailability {
    pub kind: ProviderKind,
    pub api_key_env: String,
    pub available: bool,
}

impl RuntimeConfig {
    /// Parse and validate settings from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Reject settings that would make a provider unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request_timeout must be greater than zero".to_string(),
            ));
        }

        if self.max_tokens == Some(0) {
            return Err(ConfigError::Invalid("max_tokens must be at least 1".to_string()));
        }

        for (kind, overrides) in &self.providers {
            if overrides.requests_per_minute == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "providers.{}.requests_per_minute must be at least 1",
                    kind
                )));
            }

            if let Some(url) = &overrides.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::Invalid(format!(
                        "providers.{}.base_url must start with http:// or https://",
                        kind
                    )));
                }
            }

            if overrides.default_model.as_deref().is_some_and(|m| m.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "providers.{}.default_model must not be empty",
                    kind
                )));
            }

            if overrides.api_key_env.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "providers.{}.api_key_env must not be empty",
                    kind
                )));
            }
        }

        Ok(())
    }

    /// Effective configuration for a provider: the catalog entry with any
    /// overrides applied.
    pub fn provider(&self, kind: ProviderKind) -> ProviderConfig {
        let mut config = kind.config();

        if let Some(overrides) = self.providers.get(&kind) {
            if let Some(model) = &overrides.default_model {
                config.default_model = model.clone();
            }
            if let Some(rpm) = overrides.requests_per_minute {
                config.requests_per_minute = rpm;
            }
            if let Some(url) = &overrides.base_url {
                config.base_url = url.clone();
            }
            if let Some(env) = &overrides.api_key_env {
                config.api_key_env = env.clone();
            }
        }

        config
    }

    /// Credential status for every provider, in catalog order.
    pub fn availability(&self) -> Vec<ProviderAvailability> {
        ProviderKind::ALL
            .into_iter()
            .map(|kind| {
                let api_key_env = self.provider(kind).api_key_env;
                ProviderAvailability {
                    kind,
                    available: ApiCredential::is_available(&api_key_env),
                    api_key_env,
                }
            })
            .collect()
    }

    /// Providers whose credential is present.
    pub fn available_providers(&self) -> Vec<ProviderKind> {
        self.availability()
            .into_iter()
            .filter(|a| a.available)
            .map(|a| a.kind)
            .collect()
    }
}

/// Durations written the human way (`30s`, `1m 30s`).
mod duration_human {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(D::Error::custom)
    }
}
