//! Machinery manual ingestion
//!
//! Turns an uploaded document into grounding text: extract the text layer,
//! apply the empty-text policy, cap the result at
//! [`MAX_GROUNDING_CHARS`](crate::session::MAX_GROUNDING_CHARS) characters.
//! The text is injected as one flat blob; nothing is chunked or indexed.

pub mod pdf;

pub use pdf::PdfExtractor;

use crate::config::{EmptyTextPolicy, ManualConfig};
use crate::error::{MechamindError, Result};
use crate::session::GroundingText;

/// Extracts plain text from a document
pub trait TextExtractor: Send + Sync {
    /// Returns the document's text in reading order
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::Extraction` if the document is unreadable
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// Converts uploaded documents into grounding text
///
/// # Examples
///
/// ```
/// use mechamind::config::EmptyTextPolicy;
/// use mechamind::error::Result;
/// use mechamind::manual::{DocumentIngestor, TextExtractor};
///
/// struct PlainText;
///
/// impl TextExtractor for PlainText {
///     fn extract_text(&self, bytes: &[u8]) -> Result<String> {
///         Ok(String::from_utf8_lossy(bytes).into_owned())
///     }
/// }
///
/// let ingestor = DocumentIngestor::new(Box::new(PlainText), EmptyTextPolicy::Reject);
/// let grounding = ingestor.ingest(b"Max pressure 200 bar").unwrap().unwrap();
/// assert_eq!(grounding.as_str(), "Max pressure 200 bar");
/// ```
pub struct DocumentIngestor {
    extractor: Box<dyn TextExtractor>,
    empty_text: EmptyTextPolicy,
}

impl DocumentIngestor {
    /// Creates an ingestor around an extractor
    pub fn new(extractor: Box<dyn TextExtractor>, empty_text: EmptyTextPolicy) -> Self {
        Self {
            extractor,
            empty_text,
        }
    }

    /// Creates the PDF ingestor described by the manual configuration
    pub fn pdf(config: &ManualConfig) -> Self {
        Self::new(Box::new(PdfExtractor::new()), config.empty_text)
    }

    /// Extracts and caps the document text
    ///
    /// Returns `Ok(None)` when the document has no text and the policy is
    /// [`EmptyTextPolicy::Allow`].
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::Extraction` when the document is unreadable,
    /// or has no text under [`EmptyTextPolicy::Reject`]
    pub fn ingest(&self, bytes: &[u8]) -> Result<Option<GroundingText>> {
        let text = self.extractor.extract_text(bytes)?;

        if text.trim().is_empty() {
            return match self.empty_text {
                EmptyTextPolicy::Reject => Err(MechamindError::Extraction(
                    "Document contains no extractable text".to_string(),
                )
                .into()),
                EmptyTextPolicy::Allow => {
                    tracing::warn!("Document contains no extractable text, ignoring upload");
                    Ok(None)
                }
            };
        }

        let extracted_chars = text.chars().count();
        let grounding = GroundingText::new(text);
        if grounding.char_count() < extracted_chars {
            tracing::info!(
                "Manual truncated from {} to {} characters",
                extracted_chars,
                grounding.char_count()
            );
        }

        Ok(Some(grounding))
    }
}
