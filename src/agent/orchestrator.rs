//! Turn orchestration
//!
//! Accepts an operator message, appends it to the transcript, assembles the
//! prompt, calls the model, and folds the reply back into the session.
//! One submission is fully resolved before the next is accepted.

use crate::config::Config;
use crate::error::{MechamindError, Result};
use crate::manual::DocumentIngestor;
use crate::presenter::Presenter;
use crate::prompts::build_prompt;
use crate::providers::{ModelConfig, Provider, Role};
use crate::session::{SessionState, Turn};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Shown while a model call is in flight
pub const PROGRESS_NOTICE: &str = "🔧 Analyzing machinery data...";

/// Where the orchestrator is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for the operator
    Idle,
    /// A model call is in flight
    Processing,
    /// The last turn failed; the next submission is accepted
    Error,
}

impl TurnState {
    /// Whether a new submission would be accepted
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing => write!(f, "processing"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Drives one session's turns
///
/// The session lives behind a mutex that is never held across the model
/// call, so status queries, manual uploads and transcript renders stay
/// responsive while a turn is in flight. A second submission during that
/// time is rejected with `MechamindError::InvalidState`.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use mechamind::agent::TurnOrchestrator;
/// use mechamind::config::Config;
/// use mechamind::presenter::TerminalPresenter;
/// use mechamind::providers::OllamaProvider;
///
/// # async fn example() -> mechamind::error::Result<()> {
/// let config = Config::default();
/// let provider = Arc::new(OllamaProvider::new(config.provider.timeout_seconds)?);
/// let orchestrator = TurnOrchestrator::new(provider, Arc::new(TerminalPresenter::new()), &config)?;
/// let reply = orchestrator.submit_user_message("pump won't start").await?;
/// # Ok(())
/// # }
/// ```
pub struct TurnOrchestrator {
    provider: Arc<dyn Provider>,
    presenter: Arc<dyn Presenter>,
    ingestor: DocumentIngestor,
    allowed_models: Vec<String>,
    session: Mutex<SessionState>,
    state: Mutex<TurnState>,
}

/// Resets the turn state if a submission is abandoned mid-flight
struct TurnGuard<'a> {
    state: &'a Mutex<TurnState>,
    armed: bool,
}

impl TurnGuard<'_> {
    fn finish(mut self, next: TurnState) {
        set_state(self.state, next);
        self.armed = false;
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            set_state(self.state, TurnState::Error);
        }
    }
}

fn set_state(state: &Mutex<TurnState>, next: TurnState) {
    match state.lock() {
        Ok(mut current) => *current = next,
        Err(poisoned) => *poisoned.into_inner() = next,
    }
}

impl TurnOrchestrator {
    /// Creates an orchestrator for a fresh session
    ///
    /// # Arguments
    ///
    /// * `provider` - Model backend
    /// * `presenter` - Where transcripts, errors and notices go
    /// * `config` - Validated configuration (model, allow-list, manual policy)
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::Config` if the configured model is not on
    /// the allow-list or the endpoint is not a valid URL
    pub fn new(
        provider: Arc<dyn Provider>,
        presenter: Arc<dyn Presenter>,
        config: &Config,
    ) -> Result<Self> {
        if !config.provider.is_allowed(&config.provider.model) {
            return Err(MechamindError::Config(format!(
                "Unknown model: {}",
                config.provider.model
            ))
            .into());
        }

        let model = config.provider.model_config()?;
        info!(
            "Starting session: model={}, endpoint={}",
            model.model, model.endpoint
        );

        Ok(Self {
            provider,
            presenter,
            ingestor: DocumentIngestor::pdf(&config.manual),
            allowed_models: config.provider.models.clone(),
            session: Mutex::new(SessionState::new(model)),
            state: Mutex::new(TurnState::Idle),
        })
    }

    /// Replaces the document ingestor
    pub fn with_ingestor(mut self, ingestor: DocumentIngestor) -> Self {
        self.ingestor = ingestor;
        self
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, SessionState>> {
        self.session
            .lock()
            .map_err(|_| MechamindError::InvalidState("Session lock poisoned".to_string()).into())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, TurnState>> {
        self.state
            .lock()
            .map_err(|_| MechamindError::InvalidState("Turn state lock poisoned".to_string()).into())
    }

    fn begin_turn(&self) -> Result<TurnGuard<'_>> {
        let mut state = self.lock_state()?;
        if !state.accepts_input() {
            return Err(MechamindError::InvalidState(
                "A message is already being processed".to_string(),
            )
            .into());
        }
        *state = TurnState::Processing;
        Ok(TurnGuard {
            state: &self.state,
            armed: true,
        })
    }

    /// Submits an operator message and waits for the reply
    ///
    /// On success the reply is appended and the transcript re-rendered. On
    /// failure the operator's turn stays in the transcript, no reply is
    /// appended, the state becomes [`TurnState::Error`] and the error is
    /// shown and returned. Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::InvalidState` while another submission is
    /// in flight, or the gateway error of the failed model call
    pub async fn submit_user_message(&self, text: &str) -> Result<String> {
        let guard = match self.begin_turn() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Rejected submission: {}", e);
                self.presenter.report_error(&e);
                return Err(e);
            }
        };

        let (messages, model) = {
            let mut session = self.lock_session()?;
            session.transcript.append(Role::User, text);
            (
                build_prompt(&session.transcript, &session.grounding),
                session.model.clone(),
            )
        };

        self.presenter.notify(PROGRESS_NOTICE);
        debug!(
            "Submitting turn: model={}, {} messages",
            model.model,
            messages.len()
        );

        match self.provider.generate(&messages, &model).await {
            Ok(reply) => {
                let turns = {
                    let mut session = self.lock_session()?;
                    session.transcript.append(Role::Assistant, reply.clone());
                    session.transcript.turns().to_vec()
                };
                guard.finish(TurnState::Idle);
                info!("Turn complete: transcript has {} turns", turns.len());
                self.presenter.render_transcript(&turns);
                Ok(reply)
            }
            Err(e) => {
                guard.finish(TurnState::Error);
                warn!("Model call failed: {}", e);
                let turns = self.transcript().unwrap_or_default();
                self.presenter.render_transcript(&turns);
                self.presenter.report_error(&e);
                Err(e)
            }
        }
    }

    /// Switches the session to another allow-listed model
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::Config` for models not on the allow-list and
    /// `MechamindError::InvalidState` while a turn is in flight
    pub fn select_model(&self, model: &str) -> Result<()> {
        let result = self.try_select_model(model);
        if let Err(e) = &result {
            self.presenter.report_error(e);
        }
        result
    }

    fn try_select_model(&self, model: &str) -> Result<()> {
        if !self.allowed_models.iter().any(|m| m == model) {
            return Err(MechamindError::Config(format!(
                "Unknown model: {}. Must be one of: {}",
                model,
                self.allowed_models.join(", ")
            ))
            .into());
        }

        let state = self.lock_state()?;
        if !state.accepts_input() {
            return Err(MechamindError::InvalidState(
                "Cannot switch models while a message is being processed".to_string(),
            )
            .into());
        }

        let mut session = self.lock_session()?;
        session.model.model = model.to_string();
        drop(session);
        drop(state);

        info!("Switched model to: {}", model);
        self.presenter.notify(&format!("Model switched to {}", model));
        Ok(())
    }

    /// Ingests a manual and makes it the session's grounding
    ///
    /// A failed ingestion leaves the previous grounding in place.
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::Extraction` for unreadable or (under the
    /// reject policy) empty documents
    pub fn ingest_document(&self, bytes: &[u8]) -> Result<()> {
        let result = self.try_ingest(bytes);
        if let Err(e) = &result {
            warn!("Manual ingestion failed: {}", e);
            self.presenter.report_error(e);
        }
        result
    }

    fn try_ingest(&self, bytes: &[u8]) -> Result<()> {
        match self.ingestor.ingest(bytes)? {
            Some(text) => {
                let chars = text.char_count();
                self.lock_session()?.grounding.set(text);
                info!("Manual loaded: {} characters", chars);
                self.presenter
                    .notify(&format!("Manual loaded successfully ({} characters)", chars));
            }
            None => {
                self.presenter
                    .notify("Manual has no extractable text; keeping the current context");
            }
        }
        Ok(())
    }

    /// Reads a manual from disk and ingests it
    ///
    /// # Errors
    ///
    /// Returns `MechamindError::Extraction` if the file cannot be read, or
    /// any error from [`Self::ingest_document`]
    pub fn ingest_file(&self, path: &Path) -> Result<()> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let err: anyhow::Error = MechamindError::Extraction(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))
                .into();
                self.presenter.report_error(&err);
                return Err(err);
            }
        };
        self.ingest_document(&bytes)
    }

    /// Drops the current manual from the session
    pub fn clear_grounding(&self) -> Result<()> {
        self.lock_session()?.grounding.clear();
        self.presenter.notify("Manual context cleared");
        Ok(())
    }

    /// Pushes the current transcript to the presenter
    pub fn render_transcript(&self) -> Result<()> {
        let turns = self.transcript()?;
        self.presenter.render_transcript(&turns);
        Ok(())
    }

    /// Snapshot of the transcript
    pub fn transcript(&self) -> Result<Vec<Turn>> {
        Ok(self.lock_session()?.transcript.turns().to_vec())
    }

    /// Current turn state
    pub fn state(&self) -> Result<TurnState> {
        Ok(*self.lock_state()?)
    }

    /// Current model selection
    pub fn model(&self) -> Result<ModelConfig> {
        Ok(self.lock_session()?.model.clone())
    }

    /// Models the operator may switch to
    pub fn allowed_models(&self) -> &[String] {
        &self.allowed_models
    }

    /// Size of the loaded manual in characters, zero when none
    pub fn grounding_chars(&self) -> Result<usize> {
        Ok(self.lock_session()?.grounding.char_count())
    }
}
