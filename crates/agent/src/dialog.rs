//! Welcome dialog
//!
//! Two sequential turns, language then interaction mode, followed by a
//! confirmation and navigation to the next screen. Turn 1 exhaustion is a
//! `CriticalFailure`; Turn 2 exhaustion falls back to the configured mode.
//! Any error in the sequence takes the abort-and-recover path, which applies
//! the fallback language and mode and navigates anyway.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use voice_assist_config::{DialogConfig, DialogPrompts};
use voice_assist_core::{InteractionMode, Language, Navigator, SessionStore};
use voice_assist_pipeline::{SpeechInput, SpeechOutput};

use crate::classify::{classify_language, classify_mode};
use crate::turn::{DialogTurn, TurnRunner};
use crate::AgentError;

/// What started the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// Screen finished loading; starts after `start_delay_ms`
    PageLoad,
    /// Click or keypress fallback; starts immediately
    UserAction,
}

/// Result of one orchestration
#[derive(Debug, Clone, PartialEq)]
pub struct DialogOutcome {
    pub session_id: Uuid,
    pub trigger: TriggerSource,
    pub started_at: DateTime<Utc>,
    pub language: Language,
    pub mode: InteractionMode,
    /// Abort-and-recover path was taken
    pub recovered: bool,
    pub language_attempts: u32,
    pub mode_attempts: u32,
}

#[derive(Debug, Default)]
struct Progress {
    language_attempts: u32,
    mode_attempts: u32,
}

/// Dialog Orchestrator
pub struct WelcomeDialog {
    output: Arc<SpeechOutput>,
    input: Arc<SpeechInput>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    config: DialogConfig,
    prompts: DialogPrompts,
    started: AtomicBool,
}

impl WelcomeDialog {
    pub fn new(
        output: Arc<SpeechOutput>,
        input: Arc<SpeechInput>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        config: DialogConfig,
        prompts: DialogPrompts,
    ) -> Self {
        Self {
            output,
            input,
            session,
            navigator,
            config,
            prompts,
            started: AtomicBool::new(false),
        }
    }

    /// Run the dialog if no other trigger got there first
    ///
    /// Returns `None` for every trigger after the first.
    pub async fn trigger(&self, source: TriggerSource) -> Option<DialogOutcome> {
        if source == TriggerSource::PageLoad {
            tokio::time::sleep(self.config.start_delay()).await;
        }

        if self
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(?source, "Welcome dialog already started, ignoring trigger");
            return None;
        }

        Some(self.run(source).await)
    }

    async fn run(&self, trigger: TriggerSource) -> DialogOutcome {
        let session_id = Uuid::new_v4();
        let span = tracing::info_span!("welcome_dialog", %session_id, ?trigger);
        self.run_in_span(session_id, trigger).instrument(span).await
    }

    async fn run_in_span(&self, session_id: Uuid, trigger: TriggerSource) -> DialogOutcome {
        let started_at = Utc::now();
        tracing::info!("Welcome dialog started");
        let mut progress = Progress::default();

        let (language, mode, recovered) = match self.run_turns(&mut progress).await {
            Ok((language, mode)) => (language, mode, false),
            Err(e) => {
                tracing::error!(error = %e, "Welcome dialog failed, recovering with defaults");
                let (language, mode) = self.recover().await;
                (language, mode, true)
            }
        };

        tracing::info!(%language, %mode, recovered, "Welcome dialog finished");
        DialogOutcome {
            session_id,
            trigger,
            started_at,
            language,
            mode,
            recovered,
            language_attempts: progress.language_attempts,
            mode_attempts: progress.mode_attempts,
        }
    }

    async fn run_turns(
        &self,
        progress: &mut Progress,
    ) -> Result<(Language, InteractionMode), AgentError> {
        let runner = TurnRunner::new(
            &self.output,
            &self.input,
            self.config.max_attempts,
            self.config.grace(),
        );
        let prompts = &self.prompts;

        // Turn 1: language
        let asked_in = self.config.initial_language;
        let outcome = runner
            .run(DialogTurn {
                name: "language",
                language: asked_in,
                prompt: prompts.language_question.get(asked_in).to_string(),
                retry_prompt: prompts.language_retry.get(asked_in).to_string(),
                interpret: classify_language,
                fallback: None,
            })
            .await;
        progress.language_attempts = outcome.attempts();
        let Some(language) = outcome.into_value() else {
            return Err(AgentError::CriticalFailure {
                attempts: progress.language_attempts,
            });
        };

        self.session.set_language(language).await?;
        let confirmation = prompts
            .language_confirmation
            .render(language, &[("language", language.native_name())]);
        self.output.speak(&confirmation, language).await;
        tokio::time::sleep(self.config.confirmation_pause()).await;

        // Turn 2: mode, asked in the chosen language
        let outcome = runner
            .run(DialogTurn {
                name: "mode",
                language,
                prompt: prompts.mode_question.get(language).to_string(),
                retry_prompt: prompts.mode_retry.get(language).to_string(),
                interpret: classify_mode,
                fallback: Some(self.config.fallback_mode),
            })
            .await;
        progress.mode_attempts = outcome.attempts();
        let mode = outcome.into_value().unwrap_or(self.config.fallback_mode);

        self.session.set_interaction_mode(mode).await?;

        let confirmation = prompts.confirmation.render(
            language,
            &[
                ("language", language.native_name()),
                ("mode", mode.label(language)),
            ],
        );
        self.output.speak(&confirmation, language).await;
        tokio::time::sleep(self.config.confirmation_pause()).await;

        self.navigator.navigate(&self.config.next_screen).await?;
        Ok((language, mode))
    }

    /// Apply defaults, apologize, move on; never fails
    async fn recover(&self) -> (Language, InteractionMode) {
        metrics::counter!("dialog_recovered_total").increment(1);

        let language = self.config.fallback_language;
        let mode = self.config.fallback_mode;

        if let Err(e) = self.session.set_language(language).await {
            tracing::warn!(error = %e, "Failed to persist fallback language");
        }
        if let Err(e) = self.session.set_interaction_mode(mode).await {
            tracing::warn!(error = %e, "Failed to persist fallback mode");
        }

        self.output
            .speak(self.prompts.apology.get(language), language)
            .await;
        tokio::time::sleep(self.config.confirmation_pause()).await;

        if let Err(e) = self.navigator.navigate(&self.config.next_screen).await {
            tracing::error!(error = %e, screen = %self.config.next_screen, "Navigation failed");
        }
        (language, mode)
    }
}
