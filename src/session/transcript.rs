//! Append-only conversation transcript
//!
//! Every turn ever appended is replayed into every future prompt. There is
//! no pruning and no size bound.

use crate::providers::Role;
use serde::Serialize;

/// Opening line the assistant greets every new session with
pub const GREETING: &str = "Hi! I'm MechaMind. How can I assist with your machinery today? 🏭";

/// One message in the conversation, tagged with its speaker role
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    fn new(role: Role, content: String) -> Self {
        Self { role, content }
    }

    /// Who spoke
    pub fn role(&self) -> Role {
        self.role
    }

    /// What was said
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered history of all turns in a session
///
/// A fresh transcript always starts with the assistant greeting.
///
/// # Examples
///
/// ```
/// use mechamind::session::{Transcript, GREETING};
/// use mechamind::providers::Role;
///
/// let mut transcript = Transcript::new();
/// transcript.append(Role::User, "Hydraulic press is leaking");
///
/// let turns: Vec<_> = transcript.all().collect();
/// assert_eq!(turns.len(), 2);
/// assert_eq!(turns[0].content(), GREETING);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates a transcript seeded with the greeting
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::new(Role::Assistant, GREETING.to_string())],
        }
    }

    /// Appends a turn; never fails and never touches earlier turns
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Turn::new(role, content.into()));
    }

    /// Iterates over all turns in insertion order
    ///
    /// The iterator is `Clone`, so it can be restarted without touching
    /// the transcript.
    pub fn all(&self) -> impl Iterator<Item = &Turn> + Clone + '_ {
        self.turns.iter()
    }

    /// All turns as a slice
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Most recent turn
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns, greeting included
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false: the greeting is present from construction
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
