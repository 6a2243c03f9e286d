//! Base provider trait and common types for MechaMind
//!
//! This module defines the Provider trait that model backends implement,
//! along with the role-tagged message type that makes up an assembled
//! prompt and the per-session model selection.

use crate::error::{MechamindError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Speaker role of a turn or prompt message
///
/// Serialized lowercase, which is also the wire format expected by the
/// backend (`system`, `user`, `assistant`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona and grounding instructions
    System,
    /// The machine operator
    User,
    /// The assistant
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One instruction of an assembled prompt
///
/// # Examples
///
/// ```
/// use mechamind::providers::{Message, Role};
///
/// let msg = Message::user("The conveyor belt is slipping");
/// assert_eq!(msg.role, Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a message with an explicit role
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// The model a session talks to
///
/// Chosen once per session and held fixed until the operator selects a
/// different model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier as known to the backend (e.g. `llama3.2`)
    pub model: String,
    /// Base address of the backend
    pub endpoint: Url,
    /// Sampling temperature
    pub temperature: f32,
}

impl ModelConfig {
    /// Builds a model config, parsing the endpoint
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::Config` if the endpoint is not a valid URL
    ///
    /// # Examples
    ///
    /// ```
    /// use mechamind::providers::ModelConfig;
    ///
    /// let config = ModelConfig::new("llama3.2", "http://localhost:11434", 0.3).unwrap();
    /// assert_eq!(config.endpoint.as_str(), "http://localhost:11434/");
    /// ```
    pub fn new(model: impl Into<String>, endpoint: &str, temperature: f32) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            MechamindError::Config(format!("Invalid endpoint '{}': {}", endpoint, e))
        })?;
        Ok(Self {
            model: model.into(),
            endpoint,
            temperature,
        })
    }

    /// Joins an API path onto the endpoint, tolerating a trailing slash
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Model backend abstraction
///
/// A provider performs exactly one request per call. It never retries and
/// never streams: the complete reply text comes back as one unit, or the
/// call fails with a `MechamindError::Gateway`.
///
/// # Examples
///
/// ```
/// use mechamind::providers::{Message, ModelConfig, Provider};
/// use mechamind::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn generate(&self, messages: &[Message], _config: &ModelConfig) -> Result<String> {
///         Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generates a reply for the assembled prompt
    ///
    /// # Arguments
    ///
    /// * `messages` - The ordered instruction sequence
    /// * `config` - Model, endpoint and temperature to use
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::Gateway` when the backend is unreachable,
    /// times out, does not know the model, or answers with garbage
    async fn generate(&self, messages: &[Message], config: &ModelConfig) -> Result<String>;

    /// Lists the models installed on the backend
    ///
    /// The default implementation reports that listing is unsupported.
    async fn list_models(&self, _config: &ModelConfig) -> Result<Vec<String>> {
        Err(MechamindError::Config(
            "Model listing is not supported by this provider".to_string(),
        )
        .into())
    }
}
