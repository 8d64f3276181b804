//! Speech Input Service
//!
//! Single-flight listen sessions over a host recognizer:
//!
//! ```text
//! Idle -> Starting -> Listening -> { Captured | TimedOut | EngineError | EndedEmpty } -> Idle
//! ```
//!
//! The first terminal signal commits the outcome. `ListeningSignal::Ended`
//! is broadcast before the caller is resumed.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

use voice_assist_config::SpeechInputConfig;
use voice_assist_core::{Language, RecognitionEvent, SpeechRecognizer, Utterance};

use crate::PipelineError;

/// Listen session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenState {
    Idle,
    Starting,
    Listening,
    /// Transcript produced
    Captured,
    /// Watchdog elapsed
    TimedOut,
    /// Engine reported an error
    EngineError,
    /// Engine ended the session without result or error
    EndedEmpty,
}

impl ListenState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Captured | Self::TimedOut | Self::EngineError | Self::EndedEmpty
        )
    }
}

/// UI notifications around a listen session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningSignal {
    Began,
    Ended,
}

/// Clears the busy flag however the session exits
///
/// A session dropped before reaching a terminal state (the `listen` future
/// was cancelled) also stops the recognizer and broadcasts `Ended`.
struct ActiveGuard<'a> {
    active: &'a AtomicBool,
    state: &'a Mutex<ListenState>,
    recognizer: &'a dyn SpeechRecognizer,
    signals: &'a broadcast::Sender<ListeningSignal>,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let committed = self.state.lock().is_terminal();
        if !committed {
            tracing::debug!(
                engine = self.recognizer.name(),
                "Listen cancelled, stopping recognizer"
            );
            self.recognizer.stop();
            let _ = self.signals.send(ListeningSignal::Ended);
        }
        *self.state.lock() = ListenState::Idle;
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Speech Input Service
pub struct SpeechInput {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    config: SpeechInputConfig,
    active: AtomicBool,
    state: Mutex<ListenState>,
    signals: broadcast::Sender<ListeningSignal>,
}

impl SpeechInput {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, config: SpeechInputConfig) -> Self {
        Self::build(Some(recognizer), config)
    }

    /// Service for a host without speech recognition
    pub fn unavailable(config: SpeechInputConfig) -> Self {
        Self::build(None, config)
    }

    fn build(recognizer: Option<Arc<dyn SpeechRecognizer>>, config: SpeechInputConfig) -> Self {
        let (signals, _) = broadcast::channel(16);
        Self {
            recognizer,
            config,
            active: AtomicBool::new(false),
            state: Mutex::new(ListenState::Idle),
            signals,
        }
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    /// True while a listen call is unresolved
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ListenState {
        *self.state.lock()
    }

    /// Subscribe to listening began/ended notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ListeningSignal> {
        self.signals.subscribe()
    }

    /// Capture one utterance in `language`
    ///
    /// Fails with `Busy` if another listen is still unresolved.
    pub async fn listen(&self, language: Language) -> Result<Utterance, PipelineError> {
        let result = self.listen_inner(language).await;
        let outcome = match &result {
            Ok(_) => "captured",
            Err(e) => e.label(),
        };
        metrics::counter!("voice_listen_total", "outcome" => outcome).increment(1);
        result
    }

    async fn listen_inner(&self, language: Language) -> Result<Utterance, PipelineError> {
        let Some(recognizer) = self.recognizer.as_ref() else {
            tracing::warn!("Speech recognition unavailable");
            return Err(PipelineError::RecognitionUnavailable);
        };

        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::error!("listen() called while a session is active");
            return Err(PipelineError::Busy);
        }
        let _guard = ActiveGuard {
            active: &self.active,
            state: &self.state,
            recognizer: &**recognizer,
            signals: &self.signals,
        };

        self.set_state(ListenState::Starting);
        let locale = language.locale_tag();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();

        if let Err(e) = recognizer.start(locale, events_tx) {
            tracing::warn!(engine = recognizer.name(), error = %e, "Recognizer failed to start");
            self.finish(ListenState::EngineError);
            return Err(PipelineError::Engine(e.to_string()));
        }

        // Armed from Starting so an engine that never reports Started still resolves
        let watchdog_after = self.config.watchdog();
        let watchdog = tokio::time::sleep(watchdog_after);
        tokio::pin!(watchdog);

        let (terminal, result) = loop {
            tokio::select! {
                event = events_rx.recv() => match event {
                    Some(RecognitionEvent::Started) => {
                        if self.state() == ListenState::Starting {
                            self.set_state(ListenState::Listening);
                            let _ = self.signals.send(ListeningSignal::Began);
                            watchdog.as_mut().reset(Instant::now() + watchdog_after);
                            tracing::debug!(locale, "Listening");
                        }
                    }
                    Some(RecognitionEvent::Result { transcript, confidence }) => {
                        let mut utterance = Utterance::new(transcript, language);
                        if let Some(c) = confidence {
                            utterance = utterance.with_confidence(c);
                        }
                        break (ListenState::Captured, Ok(utterance));
                    }
                    Some(RecognitionEvent::Error { code }) => {
                        break (ListenState::EngineError, Err(PipelineError::RecognitionError(code)));
                    }
                    Some(RecognitionEvent::Ended) | None => {
                        break (ListenState::EndedEmpty, Err(PipelineError::NoSpeechCaptured));
                    }
                },
                _ = &mut watchdog => {
                    break (ListenState::TimedOut, Err(PipelineError::NoSpeechDetected));
                }
            }
        };

        recognizer.stop();
        self.finish(terminal);

        match &result {
            Ok(utterance) => tracing::debug!(transcript = %utterance.transcript, "Captured"),
            Err(e) => tracing::warn!(state = ?terminal, error = %e, "Listen session failed"),
        }
        result
    }

    fn set_state(&self, state: ListenState) {
        *self.state.lock() = state;
    }

    fn finish(&self, terminal: ListenState) {
        self.set_state(terminal);
        let _ = self.signals.send(ListeningSignal::Ended);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Recognition, ScriptedRecognizer};
    use std::time::Duration;

    fn service(script: Vec<Recognition>) -> (Arc<ScriptedRecognizer>, Arc<SpeechInput>) {
        let recognizer = Arc::new(ScriptedRecognizer::new(script));
        let input = Arc::new(SpeechInput::new(
            recognizer.clone(),
            SpeechInputConfig::default(),
        ));
        (recognizer, input)
    }

    #[tokio::test(start_paused = true)]
    async fn test_captured_transcript() {
        let (recognizer, input) = service(vec![Recognition::Transcript("hindi".into())]);

        let utterance = input.listen(Language::Hindi).await.unwrap();
        assert_eq!(utterance.transcript, "hindi");
        assert_eq!(utterance.language, Language::Hindi);
        assert_eq!(recognizer.locales(), vec!["hi-IN"]);
        assert_eq!(recognizer.stop_count(), 1);
        assert_eq!(input.state(), ListenState::Idle);
        assert!(!input.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_error_carries_code() {
        let (_, input) = service(vec![Recognition::Error("network".into())]);
        assert_eq!(
            input.listen(Language::English).await.unwrap_err(),
            PipelineError::RecognitionError("network".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ended_without_result() {
        let (_, input) = service(vec![Recognition::Silence]);
        assert_eq!(
            input.listen(Language::English).await.unwrap_err(),
            PipelineError::NoSpeechCaptured
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_fires_at_twelve_seconds() {
        let (recognizer, input) = service(vec![Recognition::Hang]);

        let start = Instant::now();
        let err = input.listen(Language::English).await.unwrap_err();

        assert_eq!(err, PipelineError::NoSpeechDetected);
        assert!(start.elapsed() >= Duration::from_secs(12));
        assert!(start.elapsed() < Duration::from_millis(12_100));
        assert_eq!(recognizer.stop_count(), 1);
        assert!(!input.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_listen_is_busy() {
        let (_, input) = service(vec![Recognition::Hang, Recognition::Transcript("x".into())]);

        let first = {
            let input = input.clone();
            tokio::spawn(async move { input.listen(Language::English).await })
        };
        tokio::task::yield_now().await;
        assert!(input.is_active());

        assert_eq!(
            input.listen(Language::English).await.unwrap_err(),
            PipelineError::Busy
        );

        // First session is unaffected by the rejected call
        assert_eq!(
            first.await.unwrap().unwrap_err(),
            PipelineError::NoSpeechDetected
        );
        assert!(input.listen(Language::English).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_signals_bracket_every_session() {
        let (_, input) = service(vec![
            Recognition::Transcript("voice".into()),
            Recognition::Error("aborted".into()),
        ]);
        let mut signals = input.subscribe();

        let _ = input.listen(Language::English).await;
        let _ = input.listen(Language::English).await;

        let mut seen = Vec::new();
        while let Ok(signal) = signals.try_recv() {
            seen.push(signal);
        }
        assert_eq!(
            seen,
            vec![
                ListeningSignal::Began,
                ListeningSignal::Ended,
                ListeningSignal::Began,
                ListeningSignal::Ended,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_failure_still_ends() {
        let (_, input) = service(vec![Recognition::Refuse]);
        let mut signals = input.subscribe();

        assert!(matches!(
            input.listen(Language::English).await,
            Err(PipelineError::Engine(_))
        ));
        assert_eq!(signals.try_recv().unwrap(), ListeningSignal::Ended);
        assert!(!input.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_listen_stops_recognizer() {
        let (recognizer, input) = service(vec![
            Recognition::Hang,
            Recognition::Transcript("english".into()),
        ]);
        let mut signals = input.subscribe();

        let session = {
            let input = input.clone();
            tokio::spawn(async move { input.listen(Language::English).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(input.state(), ListenState::Listening);

        session.abort();
        assert!(session.await.unwrap_err().is_cancelled());

        assert_eq!(recognizer.stop_count(), 1);
        assert!(!input.is_active());
        assert_eq!(input.state(), ListenState::Idle);
        assert_eq!(signals.try_recv().unwrap(), ListeningSignal::Began);
        assert_eq!(signals.try_recv().unwrap(), ListeningSignal::Ended);

        // The service is usable again
        let utterance = input.listen(Language::English).await.unwrap();
        assert_eq!(utterance.transcript, "english");
        assert_eq!(recognizer.stop_count(), 2);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let input = SpeechInput::unavailable(SpeechInputConfig::default());
        assert_eq!(
            input.listen(Language::English).await.unwrap_err(),
            PipelineError::RecognitionUnavailable
        );
    }
}
