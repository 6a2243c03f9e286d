//! Test utilities for MechaMind
//!
//! Temporary files, a tiny PDF builder, a scripted model provider and a
//! presenter that records what it was asked to show.

use crate::error::{GatewayErrorKind, MechamindError, Result};
use crate::presenter::Presenter;
use crate::providers::{Message, ModelConfig, Provider};
use crate::session::Turn;
use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::Notify;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
pub fn create_test_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Model config pointing nowhere in particular
pub fn test_model_config() -> ModelConfig {
    ModelConfig::new("deepseek-r1:1.5b", "http://localhost:11434", 0.3)
        .expect("valid test endpoint")
}

/// Build an in-memory PDF with one page per entry, each showing its text
///
/// An empty string produces a page with no text operators.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for text in pages {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save test pdf");
    bytes
}

/// Scripted outcome of one provider call
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Reply with this text
    Reply(String),
    /// Fail with this gateway error kind
    Fail(GatewayErrorKind),
}

/// Provider that replays scripted outcomes and records every prompt
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Scripted>>,
    prompts: Mutex<Vec<Vec<Message>>>,
    models: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedProvider {
    /// Provider answering with the given outcomes, in order
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    /// Provider that waits for `gate` to be notified before answering
    pub fn gated(script: Vec<Scripted>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(script)
        }
    }

    /// Every prompt received so far
    pub fn prompts(&self) -> Vec<Vec<Message>> {
        self.prompts.lock().unwrap().clone()
    }

    /// Model identifiers used so far, one per call
    pub fn models(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, messages: &[Message], config: &ModelConfig) -> Result<String> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        self.models.lock().unwrap().push(config.model.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(kind)) => {
                Err(MechamindError::gateway(kind, "scripted failure").into())
            }
            None => Err(MechamindError::gateway(
                GatewayErrorKind::MalformedResponse,
                "script exhausted",
            )
            .into()),
        }
    }

    async fn list_models(&self, _config: &ModelConfig) -> Result<Vec<String>> {
        Ok(vec!["llama3.2:latest".to_string()])
    }
}

/// Presenter that records renders, errors and notices
#[derive(Default)]
pub struct RecordingPresenter {
    renders: Mutex<Vec<Vec<Turn>>>,
    errors: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl RecordingPresenter {
    /// Transcripts rendered so far
    pub fn renders(&self) -> Vec<Vec<Turn>> {
        self.renders.lock().unwrap().clone()
    }

    /// Error messages shown so far
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    /// Notices shown so far
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn render_transcript(&self, turns: &[Turn]) {
        self.renders.lock().unwrap().push(turns.to_vec());
    }

    fn report_error(&self, error: &anyhow::Error) {
        self.errors.lock().unwrap().push(error.to_string());
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "manual.pdf", b"%PDF");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF");
    }

    #[test]
    fn test_build_pdf_round_trips_through_lopdf() {
        let bytes = build_pdf(&["one", "two", ""]);
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }
}
