//! MechaMind - machinery troubleshooting assistant library
//!
//! This library provides a conversational assistant for maintenance
//! operators. Questions are answered by a locally hosted model, optionally
//! grounded in the text of an uploaded PDF manual.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `agent`: Turn orchestration and the turn state machine
//! - `session`: Transcript, grounding store and per-session state
//! - `prompts`: Persona and prompt assembly
//! - `providers`: Model gateway abstraction and the Ollama client
//! - `manual`: PDF text extraction and ingestion
//! - `presenter`: Presentation boundary and the terminal presenter
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and its handlers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mechamind::{Config, TurnOrchestrator};
//! use mechamind::presenter::TerminalPresenter;
//! use mechamind::providers::{create_provider, Provider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let provider: Arc<dyn Provider> = Arc::from(create_provider(&config.provider)?);
//!     let orchestrator =
//!         TurnOrchestrator::new(provider, Arc::new(TerminalPresenter::new()), &config)?;
//!     orchestrator.submit_user_message("hydraulic press losing pressure").await?;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod manual;
pub mod presenter;
pub mod prompts;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use agent::{TurnOrchestrator, TurnState};
pub use config::Config;
pub use error::{GatewayErrorKind, MechamindError, Result};

#[cfg(test)]
pub mod test_utils;
