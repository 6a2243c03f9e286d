//! Model listing
//!
//! Compares the configured allow-list with the models the backend has
//! installed, so operators can see which selections will actually work.

use crate::config::Config;
use crate::error::Result;
use crate::providers::{self, Provider};
use colored::Colorize;

/// Availability of one allow-listed model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAvailability {
    /// Identifier as written in the allow-list
    pub name: String,
    /// Whether the backend reports it installed
    pub installed: bool,
    /// Whether it is the configured default
    pub current: bool,
}

/// Whether an installed tag satisfies an allow-list entry
///
/// Untagged names match their `:latest` tag, as the model server resolves
/// them that way.
fn matches_installed(allowed: &str, installed: &str) -> bool {
    if allowed == installed {
        return true;
    }
    !allowed.contains(':')
        && installed
            .strip_suffix(":latest")
            .is_some_and(|base| base == allowed)
}

/// Mark each allow-listed model as installed or missing
pub fn model_availability(
    allowed: &[String],
    installed: &[String],
    current: &str,
) -> Vec<ModelAvailability> {
    allowed
        .iter()
        .map(|name| ModelAvailability {
            name: name.clone(),
            installed: installed.iter().any(|i| matches_installed(name, i)),
            current: name == current,
        })
        .collect()
}

/// Query the backend and print the allow-list with availability
///
/// # Errors
///
/// Returns the gateway error if the model server cannot be queried
pub async fn list_models(config: &Config, provider: &dyn Provider) -> Result<()> {
    let model_config = config.provider.model_config()?;
    tracing::info!("Listing models from {}", model_config.endpoint);

    let installed = provider.list_models(&model_config).await?;
    tracing::debug!("Backend reports {} installed models", installed.len());

    println!("{}", "Selectable models".bold());
    for entry in model_availability(&config.provider.models, &installed, &config.provider.model) {
        let marker = if entry.current { "*" } else { " " };
        let status = if entry.installed {
            "installed".green()
        } else {
            "not installed".red()
        };
        println!("{} {:<24} {}", marker, entry.name, status);
    }
    Ok(())
}

/// Build the configured provider and run [`list_models`]
pub async fn run_models(config: &Config) -> Result<()> {
    let provider = providers::create_provider(&config.provider)?;
    list_models(config, provider.as_ref()).await
}
