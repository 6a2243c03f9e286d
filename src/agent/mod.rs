//! Conversation engine
//!
//! Owns a session and drives it one turn at a time through the model
//! provider, pushing every visible change to a presenter.

pub mod orchestrator;

pub use orchestrator::{TurnOrchestrator, TurnState, PROGRESS_NOTICE};
