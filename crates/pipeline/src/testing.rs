//! Scripted host engines for deterministic tests
//!
//! Available with the `test-support` feature.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;

use voice_assist_core::{
    Error, RecognitionEvent, Result, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent,
    SynthesisRequest, VoiceInfo,
};

/// How the scripted synthesizer reacts to `speak`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisBehavior {
    /// Started then Finished, immediately
    Complete,
    /// Never signals; the channel stays open
    Silent,
    /// Started then Error
    Error(String),
    /// `speak` itself fails
    Refuse,
}

/// Synthesizer that records every request
pub struct ScriptedSynthesizer {
    voices: Mutex<Vec<VoiceInfo>>,
    voices_after: Option<Duration>,
    created: Instant,
    behavior: SynthesisBehavior,
    requests: Mutex<Vec<SynthesisRequest>>,
    held: Mutex<Vec<UnboundedSender<SynthesisEvent>>>,
    cancels: AtomicUsize,
}

impl Default for ScriptedSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSynthesizer {
    pub fn new() -> Self {
        Self {
            voices: Mutex::new(Vec::new()),
            voices_after: None,
            created: Instant::now(),
            behavior: SynthesisBehavior::Complete,
            requests: Mutex::new(Vec::new()),
            held: Mutex::new(Vec::new()),
            cancels: AtomicUsize::new(0),
        }
    }

    pub fn with_voices(mut self, voices: Vec<VoiceInfo>) -> Self {
        self.voices = Mutex::new(voices);
        self
    }

    /// Replace the installed voices, as a host does when its voice list changes
    pub fn set_voices(&self, voices: Vec<VoiceInfo>) {
        *self.voices.lock() = voices;
    }

    /// Voices only become visible once `delay` has elapsed since creation
    pub fn with_voices_after(mut self, delay: Duration) -> Self {
        self.voices_after = Some(delay);
        self
    }

    pub fn with_behavior(mut self, behavior: SynthesisBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().clone()
    }

    /// Texts received so far
    pub fn texts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.text.clone()).collect()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl SpeechSynthesizer for ScriptedSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo> {
        match self.voices_after {
            Some(delay) if self.created.elapsed() < delay => Vec::new(),
            _ => self.voices.lock().clone(),
        }
    }

    fn speak(&self, request: SynthesisRequest, events: UnboundedSender<SynthesisEvent>) -> Result<()> {
        self.requests.lock().push(request);

        match &self.behavior {
            SynthesisBehavior::Complete => {
                let _ = events.send(SynthesisEvent::Started);
                let _ = events.send(SynthesisEvent::Finished);
            }
            SynthesisBehavior::Silent => self.held.lock().push(events),
            SynthesisBehavior::Error(msg) => {
                let _ = events.send(SynthesisEvent::Started);
                let _ = events.send(SynthesisEvent::Error(msg.clone()));
            }
            SynthesisBehavior::Refuse => return Err(Error::engine("synthesizer refused")),
        }
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }

    fn name(&self) -> &str {
        "scripted-tts"
    }
}

/// One scripted recognition session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    /// Started, Result, Ended
    Transcript(String),
    /// Started, Error, Ended
    Error(String),
    /// Started, Ended
    Silence,
    /// Started, then nothing; the channel stays open
    Hang,
    /// `start` itself fails
    Refuse,
}

/// Recognizer that plays back a queue of sessions
///
/// Once the queue is drained every session is `Silence`.
pub struct ScriptedRecognizer {
    script: Mutex<VecDeque<Recognition>>,
    locales: Mutex<Vec<String>>,
    held: Mutex<Vec<UnboundedSender<RecognitionEvent>>>,
    stops: AtomicUsize,
}

impl ScriptedRecognizer {
    pub fn new(script: impl IntoIterator<Item = Recognition>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            locales: Mutex::new(Vec::new()),
            held: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
        }
    }

    /// Shorthand for a script of transcripts
    pub fn transcripts<I, S>(transcripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            transcripts
                .into_iter()
                .map(|t| Recognition::Transcript(t.into())),
        )
    }

    /// Locale of every session started so far
    pub fn locales(&self) -> Vec<String> {
        self.locales.lock().clone()
    }

    pub fn sessions(&self) -> usize {
        self.locales.lock().len()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&self, locale: &str, events: UnboundedSender<RecognitionEvent>) -> Result<()> {
        let next = self.script.lock().pop_front().unwrap_or(Recognition::Silence);
        if next == Recognition::Refuse {
            return Err(Error::engine("recognizer refused"));
        }
        self.locales.lock().push(locale.to_string());

        let _ = events.send(RecognitionEvent::Started);
        match next {
            Recognition::Transcript(transcript) => {
                let _ = events.send(RecognitionEvent::Result {
                    transcript,
                    confidence: Some(0.9),
                });
                let _ = events.send(RecognitionEvent::Ended);
            }
            Recognition::Error(code) => {
                let _ = events.send(RecognitionEvent::Error { code });
                let _ = events.send(RecognitionEvent::Ended);
            }
            Recognition::Silence => {
                let _ = events.send(RecognitionEvent::Ended);
            }
            Recognition::Hang => self.held.lock().push(events),
            Recognition::Refuse => {}
        }
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.held.lock().clear();
    }

    fn name(&self) -> &str {
        "scripted-stt"
    }
}
