//! Provider module for MechaMind
//!
//! This module contains the model gateway abstraction and the Ollama
//! implementation used to talk to a locally hosted model.

pub mod base;
pub mod ollama;

pub use base::{Message, ModelConfig, Provider, Role};
pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::{MechamindError, Result};

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    match config.provider_type.as_str() {
        "ollama" => Ok(Box::new(OllamaProvider::new(config.timeout_seconds)?)),
        other => Err(MechamindError::Config(format!("Unknown provider type: {}", other)).into()),
    }
}
