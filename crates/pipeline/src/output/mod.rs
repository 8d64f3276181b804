//! Speech Output Service
//!
//! Wraps a host synthesizer so that `speak` always resumes its caller once:
//! - any prior utterance is cancelled first (no overlapping audio)
//! - a voice is chosen for the language once the catalog is populated
//! - completion is the first of: engine finished, engine error, fallback timer
//!
//! Speech is best-effort. Nothing here returns an error to the caller.

mod latch;
mod voices;

pub use latch::CompletionLatch;
pub use voices::{select_voice, VoiceCatalog};

use std::sync::Arc;
use tokio::sync::mpsc;

use voice_assist_config::SpeechOutputConfig;
use voice_assist_core::{Language, SpeechSynthesizer, SynthesisEvent, SynthesisRequest};

/// How a `speak` call was resumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Engine reported the utterance finished
    Finished,
    /// Engine reported an error, or refused to start
    EngineError(String),
    /// No engine signal before the fallback timer
    FallbackTimer,
    /// Host has no synthesizer; nothing was spoken
    Unavailable,
}

impl SpeakOutcome {
    /// Metrics label
    pub fn path(&self) -> &'static str {
        match self {
            SpeakOutcome::Finished => "finished",
            SpeakOutcome::EngineError(_) => "engine_error",
            SpeakOutcome::FallbackTimer => "fallback_timer",
            SpeakOutcome::Unavailable => "unavailable",
        }
    }
}

/// Speech Output Service
pub struct SpeechOutput {
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    catalog: VoiceCatalog,
    config: SpeechOutputConfig,
}

impl SpeechOutput {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, config: SpeechOutputConfig) -> Self {
        Self {
            synthesizer: Some(synthesizer),
            catalog: VoiceCatalog::new(),
            config,
        }
    }

    /// Service for a host without speech synthesis; every call resumes at once
    pub fn unavailable(config: SpeechOutputConfig) -> Self {
        Self {
            synthesizer: None,
            catalog: VoiceCatalog::new(),
            config,
        }
    }

    pub fn is_available(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Silence whatever is playing
    pub fn cancel(&self) {
        if let Some(synth) = &self.synthesizer {
            synth.cancel();
        }
    }

    /// Speak `text` in `language` and wait until it is done
    pub async fn speak(&self, text: &str, language: Language) -> SpeakOutcome {
        let outcome = self.speak_inner(text, language).await;
        metrics::counter!("voice_speak_total", "path" => outcome.path()).increment(1);
        outcome
    }

    async fn speak_inner(&self, text: &str, language: Language) -> SpeakOutcome {
        let Some(synth) = self.synthesizer.as_ref() else {
            tracing::warn!(
                %language,
                error = %crate::PipelineError::SynthesisUnavailable,
                "Skipping utterance"
            );
            return SpeakOutcome::Unavailable;
        };

        // Supersede the current utterance
        synth.cancel();
        tokio::time::sleep(self.config.cancel_settle()).await;

        let voices = self
            .catalog
            .wait_ready(synth.as_ref(), self.config.voice_wait(), self.config.voice_poll())
            .await;
        let voice = select_voice(&voices, language).cloned();

        tracing::debug!(
            engine = synth.name(),
            %language,
            voice = voice.as_ref().map(|v| v.name.as_str()).unwrap_or("<default>"),
            chars = text.chars().count(),
            "Speaking"
        );

        let request = SynthesisRequest::new(text, language)
            .with_voice(voice)
            .with_rate(self.config.rate)
            .with_pitch(self.config.pitch)
            .with_volume(self.config.volume);

        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        if let Err(e) = synth.speak(request, events_tx) {
            tracing::warn!(error = %e, "Synthesizer refused utterance");
            return SpeakOutcome::EngineError(e.to_string());
        }

        let (latch, done) = CompletionLatch::new();

        let engine_latch = latch.clone();
        let engine_watch = tokio::spawn(async move {
            // A closed channel without a terminal event is left to the timer
            while let Some(event) = events_rx.recv().await {
                match event {
                    SynthesisEvent::Started => tracing::trace!("Utterance started"),
                    SynthesisEvent::Finished => {
                        engine_latch.fire(SpeakOutcome::Finished);
                        break;
                    }
                    SynthesisEvent::Error(msg) => {
                        engine_latch.fire(SpeakOutcome::EngineError(msg));
                        break;
                    }
                }
            }
        });

        let fallback = self.config.fallback_for(text);
        let timer_latch = latch;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(fallback).await;
            timer_latch.fire(SpeakOutcome::FallbackTimer);
        });

        let outcome = done.await.unwrap_or(SpeakOutcome::FallbackTimer);
        engine_watch.abort();
        timer.abort();

        match &outcome {
            SpeakOutcome::EngineError(msg) => {
                tracing::warn!(error = %msg, "Synthesis error, continuing")
            }
            SpeakOutcome::FallbackTimer => tracing::warn!(
                fallback_ms = fallback.as_millis() as u64,
                "No completion signal from synthesizer, resumed by fallback timer"
            ),
            _ => tracing::debug!(path = outcome.path(), "Utterance complete"),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedSynthesizer, SynthesisBehavior};
    use std::time::Duration;
    use tokio::time::Instant;
    use voice_assist_core::VoiceInfo;

    fn voices() -> Vec<VoiceInfo> {
        vec![
            VoiceInfo::new("en", "Daniel", "en-GB"),
            VoiceInfo::new("hi", "Lekha", "hi-IN"),
        ]
    }

    fn output(synth: &Arc<ScriptedSynthesizer>) -> SpeechOutput {
        SpeechOutput::new(synth.clone(), SpeechOutputConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_speak_selects_locale_voice() {
        let synth = Arc::new(ScriptedSynthesizer::new().with_voices(voices()));
        let service = output(&synth);

        assert_eq!(service.speak("नमस्ते", Language::Hindi).await, SpeakOutcome::Finished);
        assert_eq!(service.speak("Hello", Language::English).await, SpeakOutcome::Finished);

        let spoken = synth.requests();
        assert_eq!(spoken.len(), 2);
        assert_eq!(spoken[0].voice.as_ref().unwrap().id, "hi");
        assert_eq!(spoken[0].lang_tag, "hi-IN");
        assert_eq!(spoken[1].voice.as_ref().unwrap().id, "en");
    }

    #[tokio::test(start_paused = true)]
    async fn test_speak_without_match_keeps_lang_tag() {
        let synth = Arc::new(
            ScriptedSynthesizer::new().with_voices(vec![VoiceInfo::new("fr", "Amelie", "fr-CA")]),
        );
        let service = output(&synth);

        assert_eq!(service.speak("नमस्ते", Language::Hindi).await, SpeakOutcome::Finished);
        let spoken = synth.requests();
        assert!(spoken[0].voice.is_none());
        assert_eq!(spoken[0].lang_tag, "hi-IN");
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_engine_resumed_by_fallback() {
        let synth = Arc::new(
            ScriptedSynthesizer::new()
                .with_voices(voices())
                .with_behavior(SynthesisBehavior::Silent),
        );
        let service = output(&synth);
        let text = "a".repeat(50);

        let start = Instant::now();
        let outcome = service.speak(&text, Language::English).await;

        assert_eq!(outcome, SpeakOutcome::FallbackTimer);
        // settle (50ms) + fallback max(2000, 50 * 60)
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(3000));
        assert!(elapsed <= Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_text_uses_fallback_floor() {
        let synth = Arc::new(
            ScriptedSynthesizer::new()
                .with_voices(voices())
                .with_behavior(SynthesisBehavior::Silent),
        );
        let service = output(&synth);

        let start = Instant::now();
        service.speak("Hi", Language::English).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(2000));
        assert!(elapsed <= Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_error_resumes() {
        let synth = Arc::new(
            ScriptedSynthesizer::new()
                .with_voices(voices())
                .with_behavior(SynthesisBehavior::Error("interrupted".into())),
        );
        let service = output(&synth);

        assert_eq!(
            service.speak("Hello", Language::English).await,
            SpeakOutcome::EngineError("interrupted".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_refusal_resumes() {
        let synth = Arc::new(
            ScriptedSynthesizer::new()
                .with_voices(voices())
                .with_behavior(SynthesisBehavior::Refuse),
        );
        let service = output(&synth);

        assert!(matches!(
            service.speak("Hello", Language::English).await,
            SpeakOutcome::EngineError(_)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_resumes_immediately() {
        let service = SpeechOutput::unavailable(SpeechOutputConfig::default());
        let start = Instant::now();
        assert_eq!(service.speak("Hello", Language::English).await, SpeakOutcome::Unavailable);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_speak_cancels_prior_utterance() {
        let synth = Arc::new(ScriptedSynthesizer::new().with_voices(voices()));
        let service = output(&synth);

        service.speak("one", Language::English).await;
        service.speak("two", Language::English).await;
        assert_eq!(synth.cancel_count(), 2);
    }
}
