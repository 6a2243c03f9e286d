//! MechaMind - machinery troubleshooting assistant CLI
//!
#![doc = "MechaMind - machinery troubleshooting assistant CLI"]
#![doc = "Main entry point for the MechaMind application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mechamind::cli::{Cli, Commands};
use mechamind::commands;
use mechamind::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { manual, .. } => {
            if let Some(path) = &manual {
                tracing::debug!("Loading manual from: {}", path.display());
            }
            commands::chat::run_chat(config, manual).await?;
            Ok(())
        }
        Commands::Ask {
            manual, question, ..
        } => {
            commands::ask::run_ask(config, manual, question).await?;
            Ok(())
        }
        Commands::Models => {
            tracing::info!("Starting model listing");
            commands::models::run_models(&config).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so answers on stdout stay clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "mechamind=debug"
    } else {
        "mechamind=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
