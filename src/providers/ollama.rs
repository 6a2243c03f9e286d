//! Ollama provider implementation for MechaMind
//!
//! This module implements the Provider trait for Ollama, connecting to a local
//! or remote Ollama server to generate chat replies and list installed models.

use crate::error::{GatewayErrorKind, MechamindError, Result};
use crate::providers::{Message, ModelConfig, Provider};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// One non-streaming `POST /api/chat` per generated reply. The HTTP client
/// carries the request timeout; there is no retry.
///
/// # Examples
///
/// ```no_run
/// use mechamind::providers::{Message, ModelConfig, OllamaProvider, Provider};
///
/// # async fn example() -> mechamind::error::Result<()> {
/// let provider = OllamaProvider::new(120)?;
/// let config = ModelConfig::new("llama3.2", "http://localhost:11434", 0.3)?;
/// let reply = provider.generate(&[Message::user("Hello!")], &config).await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    timeout: Duration,
}

/// Request structure for Ollama's /api/chat
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: OllamaOptions,
}

/// Sampling options for Ollama
#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response structure from Ollama's /api/chat
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

/// Reply message from Ollama
#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error body Ollama sends alongside non-success statuses
#[derive(Debug, Deserialize)]
struct OllamaErrorBody {
    error: String,
}

/// Response from Ollama's /api/tags endpoint
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModelTag>,
}

/// Model metadata from /api/tags
#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    name: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Arguments
    ///
    /// * `timeout_seconds` - Request timeout applied to every backend call
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use mechamind::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(120);
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mechamind/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MechamindError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized Ollama provider: timeout={}s", timeout_seconds);

        Ok(Self { client, timeout })
    }

    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Map a transport-level failure onto a gateway error
fn transport_error(err: reqwest::Error) -> MechamindError {
    let kind = if err.is_timeout() {
        GatewayErrorKind::Timeout
    } else {
        GatewayErrorKind::Unreachable
    };
    MechamindError::gateway(kind, format!("Ollama request failed: {}", err))
}

/// Map a non-success HTTP status onto a gateway error
fn status_error(status: StatusCode, body: &str) -> MechamindError {
    let detail = serde_json::from_str::<OllamaErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string());

    let kind = match status {
        StatusCode::NOT_FOUND => GatewayErrorKind::ModelNotFound,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayErrorKind::Timeout,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => GatewayErrorKind::Unreachable,
        _ => GatewayErrorKind::MalformedResponse,
    };

    MechamindError::gateway(kind, format!("Ollama returned error {}: {}", status, detail))
}

/// Pull the reply text out of a /api/chat response body
fn parse_chat_response(body: &str) -> Result<String> {
    let response: OllamaResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!("Failed to parse Ollama response: {}", e);
        MechamindError::gateway(
            GatewayErrorKind::MalformedResponse,
            format!("Failed to parse Ollama response: {}", e),
        )
    })?;

    tracing::debug!(
        "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
        response.done,
        response.prompt_eval_count,
        response.eval_count
    );

    response
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| {
            MechamindError::gateway(
                GatewayErrorKind::MalformedResponse,
                "Ollama response has no message content",
            )
            .into()
        })
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn generate(&self, messages: &[Message], config: &ModelConfig) -> Result<String> {
        let url = config.api_url("api/chat");
        let request = OllamaRequest {
            model: &config.model,
            messages,
            stream: false,
            options: OllamaOptions {
                temperature: config.temperature,
            },
        };

        tracing::debug!(
            "Sending Ollama request: model={}, {} messages",
            config.model,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                transport_error(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::error!("Ollama returned error {}: {}", status, body);
            return Err(status_error(status, &body).into());
        }

        parse_chat_response(&body)
    }

    async fn list_models(&self, config: &ModelConfig) -> Result<Vec<String>> {
        let url = config.api_url("api/tags");
        tracing::debug!("Fetching models from Ollama: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Failed to fetch Ollama models: {}", e);
            transport_error(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(status_error(status, &body).into());
        }

        let tags: OllamaTagsResponse = serde_json::from_str(&body).map_err(|e| {
            MechamindError::gateway(
                GatewayErrorKind::MalformedResponse,
                format!("Failed to parse Ollama tags response: {}", e),
            )
        })?;

        let models: Vec<String> = tags.models.into_iter().map(|t| t.name).collect();
        tracing::debug!("Fetched {} models from Ollama", models.len());
        Ok(models)
    }
}
