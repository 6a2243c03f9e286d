//! Command-line interface definition for MechaMind
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions and
//! model listing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MechaMind - machinery troubleshooting assistant
///
/// Ask maintenance questions about your equipment, optionally grounded in
/// the machine's PDF manual, answered by a locally hosted model.
#[derive(Parser, Debug, Clone)]
#[command(name = "mechamind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for MechaMind
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive troubleshooting session
    Chat {
        /// Model to start with (must be on the configured allow-list)
        #[arg(short, long)]
        model: Option<String>,

        /// Machinery manual (PDF) to ground the session in
        #[arg(long)]
        manual: Option<PathBuf>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// Model to use (must be on the configured allow-list)
        #[arg(short, long)]
        model: Option<String>,

        /// Machinery manual (PDF) to ground the answer in
        #[arg(long)]
        manual: Option<PathBuf>,

        /// The question to ask
        question: String,
    },

    /// List selectable models and whether the backend has them installed
    Models,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Model requested on the command line, if any
    pub fn model_override(&self) -> Option<&str> {
        match &self.command {
            Commands::Chat { model, .. } | Commands::Ask { model, .. } => model.as_deref(),
            Commands::Models => None,
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Models,
        }
    }
}
