//! Special commands parser for interactive chat mode
//!
//! Special commands change the session (model, manual) or show information
//! instead of being sent to the model. They are prefixed with `/`; the
//! command word is case-insensitive, arguments keep their case.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Switch to another allow-listed model
    SwitchModel(String),

    /// List the allow-list next to what the model server has installed
    ListModels,

    /// Load a machinery manual from disk
    LoadManual(PathBuf),

    /// Drop the current manual
    ClearManual,

    /// Print the whole transcript again
    History,

    /// Show model, turn state and manual size
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; send it to the model
    None,
}

/// Split `input` into its lowercased command word and the untouched rest
fn split_command(input: &str) -> (String, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (input.to_lowercase(), ""),
    }
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for unrecognized `/` commands,
/// `CommandError::MissingArgument` when a required argument is absent and
/// `CommandError::UnsupportedArgument` for arguments a command does not take
///
/// # Examples
///
/// ```
/// use mechamind::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/model llama3.2").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchModel("llama3.2".to_string()));
///
/// let cmd = parse_special_command("hydraulic press leaking").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if lower == "exit" || lower == "quit" {
        return Ok(SpecialCommand::Exit);
    }
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let (command, arg) = split_command(trimmed);
    match command.as_str() {
        "/model" => {
            if arg.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/model".to_string(),
                    usage: "/model <model_name>".to_string(),
                })
            } else {
                Ok(SpecialCommand::SwitchModel(arg.to_string()))
            }
        }
        "/models" => no_argument(&command, arg, SpecialCommand::ListModels),
        "/manual" => match arg {
            "" => Err(CommandError::MissingArgument {
                command: "/manual".to_string(),
                usage: "/manual <path-to-pdf> | /manual clear".to_string(),
            }),
            a if a.eq_ignore_ascii_case("clear") => Ok(SpecialCommand::ClearManual),
            path => Ok(SpecialCommand::LoadManual(PathBuf::from(path))),
        },
        "/history" => no_argument(&command, arg, SpecialCommand::History),
        "/status" => no_argument(&command, arg, SpecialCommand::ShowStatus),
        "/help" | "/?" => no_argument(&command, arg, SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(command)),
    }
}

fn no_argument(
    command: &str,
    arg: &str,
    parsed: SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    if arg.is_empty() {
        Ok(parsed)
    } else {
        Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        })
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

MODEL:
  /model <name>     - Switch to an allow-listed model
  /models           - Show allow-listed models and which are installed

MACHINERY MANUAL:
  /manual <path>    - Load a PDF manual as context for following questions
  /manual clear     - Forget the loaded manual

SESSION INFORMATION:
  /history          - Print the whole conversation again
  /status           - Show model, state and manual size
  /help             - Show this help message
  /?                - Same as /help

SESSION CONTROL:
  /exit, exit       - Leave the session
  /quit, quit       - Same as exit

NOTES:
  - Commands are case-insensitive; paths and model names are not
  - Anything else is sent to MechaMind as a question
  - Only the first 100000 characters of a manual are used
"#
    );
}
