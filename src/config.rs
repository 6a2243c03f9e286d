//! Configuration management for MechaMind
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{MechamindError, Result};
use crate::providers::ModelConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for MechaMind
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Model backend configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Manual ingestion settings
    #[serde(default)]
    pub manual: ManualConfig,
}

/// Model backend configuration
///
/// The endpoint and temperature are fixed for a session; the model is
/// chosen from `models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Backend base address
    #[serde(default = "default_host")]
    pub host: String,

    /// Model selected at session start
    #[serde(default = "default_model")]
    pub model: String,

    /// Models the operator may select
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Timeout for a single model call (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_provider_type() -> String {
    "ollama".to_string()
}

fn default_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "deepseek-r1:1.5b".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "deepseek-r1:1.5b".to_string(),
        "deepseek-r1:3b".to_string(),
        "llama3.2".to_string(),
    ]
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            host: default_host(),
            model: default_model(),
            models: default_models(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Builds the session model selection from this configuration
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::Config` if the host is not a valid URL
    pub fn model_config(&self) -> Result<ModelConfig> {
        ModelConfig::new(self.model.clone(), &self.host, self.temperature)
    }

    /// Whether `model` is on the allow-list
    pub fn is_allowed(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }
}

/// What to do when a manual yields no extractable text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTextPolicy {
    /// Fail the ingestion with an extraction error
    #[default]
    Reject,
    /// Accept the upload and leave the grounding unchanged
    Allow,
}

impl std::str::FromStr for EmptyTextPolicy {
    type Err = MechamindError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "allow" => Ok(Self::Allow),
            other => Err(MechamindError::Config(format!(
                "Invalid empty text policy: {}. Must be one of: reject, allow",
                other
            ))),
        }
    }
}

/// Manual ingestion settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ManualConfig {
    /// Behavior for manuals without extractable text
    #[serde(default)]
    pub empty_text: EmptyTextPolicy,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MechamindError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| MechamindError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("MECHAMIND_OLLAMA_HOST") {
            self.provider.host = host;
        }

        if let Ok(model) = std::env::var("MECHAMIND_MODEL") {
            self.provider.model = model;
        }

        if let Ok(temperature) = std::env::var("MECHAMIND_TEMPERATURE") {
            if let Ok(value) = temperature.parse() {
                self.provider.temperature = value;
            } else {
                tracing::warn!("Invalid MECHAMIND_TEMPERATURE: {}", temperature);
            }
        }

        if let Ok(timeout) = std::env::var("MECHAMIND_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid MECHAMIND_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(policy) = std::env::var("MECHAMIND_EMPTY_MANUAL") {
            match policy.parse() {
                Ok(value) => self.manual.empty_text = value,
                Err(e) => tracing::warn!("{}", e),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(model) = cli.model_override() {
            tracing::debug!(model = %model, "CLI override: model");
            self.provider.model = model.to_string();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::Config` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type != "ollama" {
            return Err(MechamindError::Config(format!(
                "Invalid provider type: {}. Must be: ollama",
                self.provider.provider_type
            ))
            .into());
        }

        if self.provider.models.is_empty() {
            return Err(
                MechamindError::Config("provider.models cannot be empty".to_string()).into(),
            );
        }

        if !self.provider.is_allowed(&self.provider.model) {
            return Err(MechamindError::Config(format!(
                "Unknown model: {}. Must be one of: {}",
                self.provider.model,
                self.provider.models.join(", ")
            ))
            .into());
        }

        url::Url::parse(&self.provider.host).map_err(|e| {
            MechamindError::Config(format!("Invalid provider.host '{}': {}", self.provider.host, e))
        })?;

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(MechamindError::Config(
                "provider.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.provider.timeout_seconds == 0 {
            return Err(MechamindError::Config(
                "provider.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.provider_type, "ollama");
        assert_eq!(config.provider.host, "http://localhost:11434");
        assert_eq!(config.provider.model, "deepseek-r1:1.5b");
        assert_eq!(config.provider.models.len(), 3);
        assert!((config.provider.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.provider.timeout_seconds, 120);
        assert_eq!(config.manual.empty_text, EmptyTextPolicy::Reject);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_model_not_allowed() {
        let mut config = Config::default();
        config.provider.model = "gpt-4o".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Unknown model"));
    }

    #[test]
    fn test_config_validation_empty_allow_list() {
        let mut config = Config::default();
        config.provider.models.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_host() {
        let mut config = Config::default();
        config.provider.host = "localhost 11434".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_temperature_range() {
        let mut config = Config::default();
        config.provider.temperature = 2.5;
        assert!(config.validate().is_err());

        config.provider.temperature = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.provider.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
provider:
  type: ollama
  host: http://gpu-box:11434
  model: llama3.2
  models:
    - llama3.2
    - mistral
  temperature: 0.1
  timeout_seconds: 45

manual:
  empty_text: allow
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.host, "http://gpu-box:11434");
        assert_eq!(config.provider.model, "llama3.2");
        assert_eq!(config.provider.models, vec!["llama3.2", "mistral"]);
        assert_eq!(config.provider.timeout_seconds, 45);
        assert_eq!(config.manual.empty_text, EmptyTextPolicy::Allow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("provider:\n  model: llama3.2\n").unwrap();
        assert_eq!(config.provider.model, "llama3.2");
        assert_eq!(config.provider.host, "http://localhost:11434");
        assert_eq!(config.manual.empty_text, EmptyTextPolicy::Reject);
    }

    #[test]
    fn test_model_config_from_provider_config() {
        let model = ProviderConfig::default().model_config().unwrap();
        assert_eq!(model.model, "deepseek-r1:1.5b");
        assert_eq!(model.endpoint.as_str(), "http://localhost:11434/");
    }

    #[test]
    fn test_empty_text_policy_parse() {
        assert_eq!(
            "ALLOW".parse::<EmptyTextPolicy>().unwrap(),
            EmptyTextPolicy::Allow
        );
        assert!("sometimes".parse::<EmptyTextPolicy>().is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("MECHAMIND_MODEL", "llama3.2");
        std::env::set_var("MECHAMIND_TEMPERATURE", "0.7");
        std::env::set_var("MECHAMIND_TIMEOUT_SECONDS", "not-a-number");
        std::env::set_var("MECHAMIND_EMPTY_MANUAL", "allow");

        let mut config = Config::default();
        config.apply_env_vars();

        std::env::remove_var("MECHAMIND_MODEL");
        std::env::remove_var("MECHAMIND_TEMPERATURE");
        std::env::remove_var("MECHAMIND_TIMEOUT_SECONDS");
        std::env::remove_var("MECHAMIND_EMPTY_MANUAL");

        assert_eq!(config.provider.model, "llama3.2");
        assert!((config.provider.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.provider.timeout_seconds, 120);
        assert_eq!(config.manual.empty_text, EmptyTextPolicy::Allow);
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        let cli = crate::cli::Cli::default();
        let config = Config::load("/nonexistent/mechamind.yaml", &cli).unwrap();
        assert_eq!(config.provider.provider_type, "ollama");
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "provider:\n  model: deepseek-r1:3b\n").unwrap();

        let cli = crate::cli::Cli::default();
        let config = Config::load(path.to_str().unwrap(), &cli).unwrap();
        assert_eq!(config.provider.model, "deepseek-r1:3b");
    }

    #[test]
    #[serial]
    fn test_load_rejects_invalid_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "provider: [unclosed").unwrap();

        let cli = crate::cli::Cli::default();
        let err = Config::load(path.to_str().unwrap(), &cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        assert!(matches!(
            err.downcast_ref::<MechamindError>(),
            Some(MechamindError::Config(_))
        ));
    }

    #[test]
    #[serial]
    fn test_load_unreadable_file_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();

        // A directory exists but cannot be read as a file.
        let cli = crate::cli::Cli::default();
        let err = Config::load(dir.path().to_str().unwrap(), &cli).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MechamindError>(),
            Some(MechamindError::Config(_))
        ));
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
