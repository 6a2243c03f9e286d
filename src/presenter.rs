//! Presentation boundary
//!
//! The orchestrator pushes transcripts, errors and notices through the
//! [`Presenter`] trait. The terminal implementation prints to stdout with
//! role-colored headers.

use crate::providers::Role;
use crate::session::Turn;
use colored::Colorize;

/// Receives everything the operator should see
pub trait Presenter: Send + Sync {
    /// Show the transcript after it changed
    fn render_transcript(&self, turns: &[Turn]);

    /// Show a failed operation; the session stays usable
    fn report_error(&self, error: &anyhow::Error);

    /// Show a short informational message
    fn notify(&self, message: &str);
}

/// Prints to the terminal
///
/// Chat-style output: on a re-render only turns the operator has not seen
/// yet are printed, so the scrollback reads like the full transcript.
#[derive(Debug)]
pub struct TerminalPresenter {
    shown: std::sync::atomic::AtomicUsize,
    echo_operator: bool,
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self {
            shown: std::sync::atomic::AtomicUsize::new(0),
            echo_operator: true,
        }
    }
}

impl TerminalPresenter {
    /// Creates a presenter that has shown nothing yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip operator turns on re-render; they are already on screen as typed
    pub fn without_echo(mut self) -> Self {
        self.echo_operator = false;
        self
    }

    /// Print every turn again, regardless of what was shown before
    pub fn print_full(&self, turns: &[Turn]) {
        for turn in turns {
            println!("{}", format_turn(turn));
        }
        self.shown
            .store(turns.len(), std::sync::atomic::Ordering::SeqCst);
    }
}

/// Format a turn as a role header followed by its content
pub fn format_turn(turn: &Turn) -> String {
    let header = match turn.role() {
        Role::Assistant => "🏭 MechaMind".green().bold(),
        Role::User => "🔧 You".cyan().bold(),
        Role::System => "⚙ System".yellow().bold(),
    };
    format!("{}\n{}\n", header, turn.content())
}

impl Presenter for TerminalPresenter {
    fn render_transcript(&self, turns: &[Turn]) {
        let already = self
            .shown
            .swap(turns.len(), std::sync::atomic::Ordering::SeqCst);
        for turn in turns.iter().skip(already) {
            if turn.role() == Role::User && !self.echo_operator {
                continue;
            }
            println!("{}", format_turn(turn));
        }
    }

    fn report_error(&self, error: &anyhow::Error) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }

    fn notify(&self, message: &str) {
        println!("{}", message.dimmed());
    }
}

/// Leaves stdout to the caller
///
/// Used for one-shot questions: the answer is printed by the command, while
/// errors and notices go to stderr so output can be piped.
#[derive(Debug, Default)]
pub struct StderrPresenter;

impl Presenter for StderrPresenter {
    fn render_transcript(&self, _turns: &[Turn]) {}

    fn report_error(&self, error: &anyhow::Error) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }

    fn notify(&self, message: &str) {
        eprintln!("{}", message.dimmed());
    }
}
