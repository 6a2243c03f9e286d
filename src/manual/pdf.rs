//! PDF text extraction backed by lopdf

use crate::error::{MechamindError, Result};
use crate::manual::TextExtractor;
use lopdf::Document;

/// Extracts the text layer of a PDF, page by page
///
/// Pages are visited in page-number order and their text concatenated as
/// extracted, with no separator normalization. A page whose text cannot be
/// decoded contributes nothing. There is no OCR: scanned pages are empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Creates a PDF extractor
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let document = Document::load_mem(bytes)
            .map_err(|e| MechamindError::Extraction(format!("Unreadable PDF: {}", e)))?;

        let pages = document.get_pages();
        tracing::debug!("Extracting text from {} PDF pages", pages.len());

        let mut text = String::new();
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => {
                    tracing::warn!("No text extracted from page {}: {}", page_number, e);
                }
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::build_pdf;

    #[test]
    fn test_extracts_pages_in_order() {
        let pdf = build_pdf(&["Lubricate bearings weekly", "Torque bolts to 50Nm"]);
        let text = PdfExtractor::new().extract_text(&pdf).unwrap();

        let first = text.find("Lubricate bearings weekly").unwrap();
        let second = text.find("Torque bolts to 50Nm").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_page_without_text_yields_nothing() {
        let pdf = build_pdf(&[""]);
        let text = PdfExtractor::new().extract_text(&pdf).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_garbage_bytes_are_an_extraction_error() {
        let err = PdfExtractor::new()
            .extract_text(b"definitely not a pdf")
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MechamindError>(),
            Some(MechamindError::Extraction(_))
        ));
    }
}
