/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`:   Interactive troubleshooting session
- `ask`:    One question, one answer
- `models`: Allow-list and installed models

Each handler builds the provider and a `TurnOrchestrator` from the loaded
configuration and leaves the conversation logic to the agent module.
*/

use crate::agent::TurnOrchestrator;
use crate::config::Config;
use crate::error::Result;
use crate::presenter::{Presenter, StderrPresenter, TerminalPresenter};
use crate::providers::{create_provider, Provider};
use std::path::PathBuf;
use std::sync::Arc;

// Special commands parser for the chat loop
pub mod special_commands;

// Model listing
pub mod models;

/// Build the configured provider and an orchestrator around it
fn build_session(
    config: &Config,
    presenter: Arc<dyn Presenter>,
) -> Result<(Arc<dyn Provider>, TurnOrchestrator)> {
    let provider: Arc<dyn Provider> = Arc::from(create_provider(&config.provider)?);
    let orchestrator = TurnOrchestrator::new(Arc::clone(&provider), presenter, config)?;
    Ok((provider, orchestrator))
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Runs a readline loop: slash commands act on the session, anything
    //! else is submitted to the orchestrator as an operator message.

    use super::*;
    use crate::agent::TurnState;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration (model overrides already applied)
    /// * `manual` - Optional PDF to load before the first question
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mechamind::commands::chat;
    /// use mechamind::config::Config;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// chat::run_chat(Config::default(), None).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_chat(config: Config, manual: Option<PathBuf>) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let presenter = Arc::new(TerminalPresenter::new().without_echo());
        let (provider, orchestrator) = build_session(&config, presenter.clone())?;

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&orchestrator)?;
        orchestrator.render_transcript()?;

        if let Some(path) = manual {
            // Failures are already shown; the session starts without a manual.
            if let Err(e) = orchestrator.ingest_file(&path) {
                tracing::debug!("Initial manual not loaded: {}", e);
            }
        }

        loop {
            let prompt = format!("{} ", "🔧 >".cyan().bold());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}\n", e);
                            continue;
                        }
                    };

                    rl.add_history_entry(trimmed)?;

                    match command {
                        SpecialCommand::None => {}
                        SpecialCommand::Exit => break,
                        other => {
                            handle_special_command(
                                other,
                                &orchestrator,
                                &presenter,
                                provider.as_ref(),
                                &config,
                            )
                            .await?;
                            continue;
                        }
                    }

                    if let Err(e) = orchestrator.submit_user_message(trimmed).await {
                        tracing::debug!("Turn failed: {}", e);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Run one slash command against the session
    ///
    /// Operation failures (unknown model, unreadable manual, unreachable
    /// backend) are shown to the operator and do not end the session.
    async fn handle_special_command(
        command: SpecialCommand,
        orchestrator: &TurnOrchestrator,
        presenter: &TerminalPresenter,
        provider: &dyn Provider,
        config: &Config,
    ) -> Result<()> {
        match command {
            SpecialCommand::SwitchModel(model) => {
                if let Err(e) = orchestrator.select_model(&model) {
                    tracing::debug!("Model switch rejected: {}", e);
                }
            }
            SpecialCommand::ListModels => {
                let mut current = config.clone();
                current.provider.model = orchestrator.model()?.model;
                if let Err(e) = models::list_models(&current, provider).await {
                    presenter.report_error(&e);
                }
            }
            SpecialCommand::LoadManual(path) => {
                if let Err(e) = orchestrator.ingest_file(&path) {
                    tracing::debug!("Manual not loaded: {}", e);
                }
            }
            SpecialCommand::ClearManual => orchestrator.clear_grounding()?,
            SpecialCommand::History => presenter.print_full(&orchestrator.transcript()?),
            SpecialCommand::ShowStatus => print_status_display(orchestrator)?,
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit | SpecialCommand::None => {}
        }
        Ok(())
    }

    /// Display welcome banner at the start of interactive chat mode
    fn print_welcome_banner(orchestrator: &TurnOrchestrator) -> Result<()> {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║        MechaMind Machinery Assistant - Welcome!              ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Model:  {}", orchestrator.model()?.model.green());
        println!("Type '/help' for available commands, 'exit' to quit\n");
        Ok(())
    }

    /// Display the session status block
    fn print_status_display(orchestrator: &TurnOrchestrator) -> Result<()> {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                   MechaMind Session Status                   ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("{}", format_status(orchestrator)?);
        Ok(())
    }

    /// Render model, allow-list, turn state and manual size as text
    pub(crate) fn format_status(orchestrator: &TurnOrchestrator) -> Result<String> {
        let model = orchestrator.model()?;
        let state = orchestrator.state()?;
        let manual_chars = orchestrator.grounding_chars()?;
        let state_tag = match state {
            TurnState::Idle => state.to_string().green(),
            TurnState::Processing => state.to_string().yellow(),
            TurnState::Error => state.to_string().red(),
        };
        let input = if state.accepts_input() {
            "ready"
        } else {
            "busy"
        };
        let allowed: Vec<String> = orchestrator
            .allowed_models()
            .iter()
            .map(|m| {
                if *m == model.model {
                    format!("{} (current)", m)
                } else {
                    m.clone()
                }
            })
            .collect();
        let manual = if manual_chars > 0 {
            format!("{} characters", manual_chars)
        } else {
            "none".to_string()
        };

        let lines = [
            format!("Model:             {}", model.model),
            format!("Allowed Models:    {}", allowed.join(", ")),
            format!("Endpoint:          {}", model.endpoint),
            format!("Temperature:       {}", model.temperature),
            format!("State:             {} ({})", state_tag, input),
            format!("Manual:            {}", manual),
            format!(
                "Conversation Size: {} turns",
                orchestrator.transcript()?.len()
            ),
        ];
        Ok(format!("{}\n", lines.join("\n")))
    }
}

// One-shot question handler
pub mod ask {
    //! Answers a single question and exits.

    use super::*;

    /// Ask one question, optionally grounded in a manual, and print the answer
    ///
    /// The answer alone goes to stdout; errors and notices go to stderr.
    ///
    /// # Errors
    ///
    /// Returns the extraction error if the manual cannot be used, or the
    /// gateway error if the model call fails
    pub async fn run_ask(config: Config, manual: Option<PathBuf>, question: String) -> Result<()> {
        tracing::info!("Answering one-shot question");

        let (_, orchestrator) = build_session(&config, Arc::new(StderrPresenter))?;
        if let Some(path) = manual {
            orchestrator.ingest_file(&path)?;
        }

        let answer = orchestrator.submit_user_message(&question).await?;
        println!("{}", answer);
        Ok(())
    }
}
