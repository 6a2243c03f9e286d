//! Grounding text and the single-slot store that holds it

use std::sync::{Arc, RwLock};

/// Maximum number of characters of manual text kept for grounding
pub const MAX_GROUNDING_CHARS: usize = 100_000;

/// Manual text injected into the system instruction
///
/// Capped at [`MAX_GROUNDING_CHARS`] characters. Construction keeps the
/// first characters up to the cap and silently drops the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingText(Arc<str>);

impl GroundingText {
    /// Wraps `text`, truncating it to the character cap
    ///
    /// # Examples
    ///
    /// ```
    /// use mechamind::session::{GroundingText, MAX_GROUNDING_CHARS};
    ///
    /// let text = GroundingText::new("x".repeat(MAX_GROUNDING_CHARS + 10));
    /// assert_eq!(text.char_count(), MAX_GROUNDING_CHARS);
    /// ```
    pub fn new(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if let Some((cut, _)) = text.char_indices().nth(MAX_GROUNDING_CHARS) {
            text.truncate(cut);
        }
        Self(Arc::from(text))
    }

    /// The text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the text is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Holds at most one grounding text for the session
///
/// `set` swaps the whole blob under a write lock, so a reader sees either
/// the previous blob or the new one in full.
#[derive(Debug, Default)]
pub struct GroundingStore {
    current: RwLock<Option<GroundingText>>,
}

impl GroundingStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored blob
    pub fn set(&self, text: GroundingText) {
        match self.current.write() {
            Ok(mut slot) => *slot = Some(text),
            Err(poisoned) => *poisoned.into_inner() = Some(text),
        }
    }

    /// Returns the current blob, if any
    pub fn get(&self) -> Option<GroundingText> {
        match self.current.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drops the stored blob
    pub fn clear(&self) {
        match self.current.write() {
            Ok(mut slot) => *slot = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    /// Character count of the stored blob, zero when empty
    pub fn char_count(&self) -> usize {
        self.get().map(|t| t.char_count()).unwrap_or(0)
    }
}
