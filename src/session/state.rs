//! Per-session container for transcript, grounding and model selection

use crate::providers::ModelConfig;
use crate::session::{GroundingStore, Transcript};

/// Everything one interactive session knows
///
/// Created when the session starts and dropped when it ends. Nothing is
/// persisted.
#[derive(Debug)]
pub struct SessionState {
    /// Conversation so far
    pub transcript: Transcript,
    /// Manual text, if one was ingested
    pub grounding: GroundingStore,
    /// Model the session talks to
    pub model: ModelConfig,
}

impl SessionState {
    /// Starts a session with a seeded transcript and no grounding
    pub fn new(model: ModelConfig) -> Self {
        Self {
            transcript: Transcript::new(),
            grounding: GroundingStore::new(),
            model,
        }
    }
}
