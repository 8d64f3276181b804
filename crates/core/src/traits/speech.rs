//! Host speech engine traits
//!
//! Both engines follow the callback model of browser speech APIs: a request
//! is started synchronously and lifecycle events arrive later on a channel.
//! An engine may never send a terminal event; the services in the pipeline
//! crate guard against that with their own timers.

use tokio::sync::mpsc::UnboundedSender;

use crate::{Result, SynthesisRequest, VoiceInfo};

/// Events reported by a synthesis engine for one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisEvent {
    /// Audio output began
    Started,
    /// Utterance finished playing
    Finished,
    /// Engine failed or the utterance was interrupted
    Error(String),
}

/// Text-to-Speech engine provided by the host environment
///
/// # Example
///
/// ```ignore
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
/// synth.cancel();
/// synth.speak(SynthesisRequest::new("नमस्ते", Language::Hindi), tx)?;
/// while let Some(event) = rx.recv().await { /* ... */ }
/// ```
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Current voice catalog snapshot; may be empty until the host populates it
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Queue an utterance; events for it are sent on `events`
    fn speak(&self, request: SynthesisRequest, events: UnboundedSender<SynthesisEvent>) -> Result<()>;

    /// Silence the current utterance and drop anything queued
    fn cancel(&self);

    /// Engine name for logging
    fn name(&self) -> &str;
}

/// Events reported by a recognition engine for one session
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// Audio capture began
    Started,
    /// Final transcript for the utterance
    Result {
        transcript: String,
        confidence: Option<f32>,
    },
    /// Engine error (e.g. "no-speech", "network", "not-allowed")
    Error { code: String },
    /// Engine ended the session
    Ended,
}

/// Speech-to-Text engine provided by the host environment
///
/// Sessions are single-utterance and report final results only.
pub trait SpeechRecognizer: Send + Sync + 'static {
    /// Begin a recognition session for the given locale tag (e.g. "hi-IN")
    fn start(&self, locale: &str, events: UnboundedSender<RecognitionEvent>) -> Result<()>;

    /// Stop the active session, if any
    fn stop(&self);

    /// Engine name for logging
    fn name(&self) -> &str;
}
