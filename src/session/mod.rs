//! Session state for MechaMind
//!
//! A session binds one append-only transcript, at most one grounding text
//! and the selected model. Sessions are plain values: construct as many as
//! needed, nothing is global.

pub mod grounding;
pub mod state;
pub mod transcript;

pub use grounding::{GroundingStore, GroundingText, MAX_GROUNDING_CHARS};
pub use state::SessionState;
pub use transcript::{Transcript, Turn, GREETING};
