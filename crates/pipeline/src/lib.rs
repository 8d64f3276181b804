//! Speech services over host engines
//!
//! This crate wraps the host's callback-style speech engines into
//! awaitable operations:
//! - Speech output: voice selection, cancel-then-speak, guaranteed completion
//! - Speech input: single-flight listen with a hard watchdog
//! - Countdown presenter driven by listening start/end signals
//! - Console engines for running without a browser host

pub mod countdown;
pub mod host;
pub mod input;
pub mod output;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use countdown::CountdownPresenter;
pub use host::{ConsoleLines, ConsoleRecognizer, ConsoleSynthesizer};
pub use input::{ListenState, ListeningSignal, SpeechInput};
pub use output::{select_voice, SpeakOutcome, SpeechOutput};

use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("A listen session is already active")]
    Busy,

    #[error("No speech detected before the watchdog fired")]
    NoSpeechDetected,

    #[error("Recognition error: {0}")]
    RecognitionError(String),

    #[error("Recognition ended without a transcript")]
    NoSpeechCaptured,

    #[error("Speech synthesis is not available")]
    SynthesisUnavailable,

    #[error("Speech recognition is not available")]
    RecognitionUnavailable,

    #[error("Engine error: {0}")]
    Engine(String),
}

impl PipelineError {
    /// Short label used for metrics and logs
    pub fn label(&self) -> &'static str {
        match self {
            PipelineError::Busy => "busy",
            PipelineError::NoSpeechDetected => "timeout",
            PipelineError::RecognitionError(_) => "error",
            PipelineError::NoSpeechCaptured => "empty",
            PipelineError::SynthesisUnavailable | PipelineError::RecognitionUnavailable => {
                "unavailable"
            }
            PipelineError::Engine(_) => "engine",
        }
    }
}

impl From<voice_assist_core::Error> for PipelineError {
    fn from(err: voice_assist_core::Error) -> Self {
        PipelineError::Engine(err.to_string())
    }
}

impl From<PipelineError> for voice_assist_core::Error {
    fn from(err: PipelineError) -> Self {
        voice_assist_core::Error::Pipeline(err.to_string())
    }
}
