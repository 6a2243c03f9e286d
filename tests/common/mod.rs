use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

use mechamind::config::Config;
use mechamind::presenter::Presenter;
use mechamind::session::Turn;

/// Presenter that keeps everything it was asked to show
#[allow(dead_code)]
#[derive(Default)]
pub struct CapturingPresenter {
    pub renders: Mutex<Vec<Vec<Turn>>>,
    pub errors: Mutex<Vec<String>>,
    pub notices: Mutex<Vec<String>>,
}

impl Presenter for CapturingPresenter {
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

/// Default configuration pointed at a mock model server
#[allow(dead_code)]
pub fn config_for(host: &str) -> Config {
    let mut config = Config::default();
    config.provider.host = host.to_string();
    config.provider.timeout_seconds = 5;
    config
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Ollama /api/chat success body carrying `content`
#[allow(dead_code)]
pub fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "model": "deepseek-r1:1.5b",
        "created_at": "2024-05-01T12:00:00Z",
        "message": { "role": "assistant", "content": content },
        "done": true,
        "prompt_eval_count": 120,
        "eval_count": 42
    })
}
