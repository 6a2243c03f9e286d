//! Prompt assembly
//!
//! Linearizes persona, grounding and the full transcript into the exact
//! message sequence sent to the model. Assembly is purely structural: no
//! summarization, truncation or token budgeting.

pub mod persona;

use crate::providers::Message;
use crate::session::{GroundingStore, Transcript};

/// Builds the instruction sequence for the next model call
///
/// The result is one system instruction followed by every transcript turn
/// in its original order, each rendered under its own role.
///
/// # Arguments
///
/// * `transcript` - The session transcript, greeting included
/// * `grounding` - The session grounding store
///
/// # Examples
///
/// ```
/// use mechamind::prompts::build_prompt;
/// use mechamind::providers::Role;
/// use mechamind::session::{GroundingStore, Transcript};
///
/// let mut transcript = Transcript::new();
/// transcript.append(Role::User, "pump won't start");
///
/// let messages = build_prompt(&transcript, &GroundingStore::new());
/// assert_eq!(messages.len(), 3);
/// assert_eq!(messages[0].role, Role::System);
/// ```
pub fn build_prompt(transcript: &Transcript, grounding: &GroundingStore) -> Vec<Message> {
    let manual = grounding.get();
    let system = persona::generate_system_prompt(manual.as_ref().map(|m| m.as_str()));

    let mut messages = Vec::with_capacity(transcript.len() + 1);
    messages.push(Message::system(system));
    messages.extend(
        transcript
            .all()
            .map(|turn| Message::new(turn.role(), turn.content())),
    );

    tracing::debug!(
        "Assembled prompt: {} messages, grounding={}",
        messages.len(),
        manual.is_some()
    );

    messages
}
