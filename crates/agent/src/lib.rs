//! Welcome dialog and form flow
//!
//! Features:
//! - Generic prompt/listen/retry turn protocol
//! - Two-turn welcome dialog (language, interaction mode) with abort-and-recover
//! - Keyword classification of transcripts
//! - In-memory session store
//! - Question-simplification client with a deterministic fallback
//! - Form-filling flow driven by the chosen mode

pub mod classify;
pub mod dialog;
pub mod form_flow;
pub mod question;
pub mod session;
pub mod turn;

pub use classify::{classify_language, classify_mode};
pub use dialog::{DialogOutcome, TriggerSource, WelcomeDialog};
pub use form_flow::{FormAnswers, FormFlow, TextInput};
pub use question::QuestionClient;
pub use session::InMemorySessionStore;
pub use turn::{DialogTurn, TurnOutcome, TurnRunner};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    /// Language turn exhausted every attempt
    #[error("No usable reply after {attempts} attempts")]
    CriticalFailure { attempts: u32 },

    #[error("Session error: {0}")]
    Session(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Question service error: {0}")]
    QuestionService(String),

    #[error("Unknown form: {0}")]
    UnknownForm(String),
}

impl From<voice_assist_core::Error> for AgentError {
    fn from(err: voice_assist_core::Error) -> Self {
        use voice_assist_core::Error;

        match err {
            Error::Session(msg) => AgentError::Session(msg),
            Error::Navigation(msg) => AgentError::Navigation(msg),
            other => AgentError::Pipeline(other.to_string()),
        }
    }
}

impl From<voice_assist_pipeline::PipelineError> for AgentError {
    fn from(err: voice_assist_pipeline::PipelineError) -> Self {
        AgentError::Pipeline(err.to_string())
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::QuestionService(err.to_string())
    }
}
