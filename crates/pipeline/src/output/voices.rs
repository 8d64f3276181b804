//! Voice catalog and voice selection

use parking_lot::RwLock;
use std::time::Duration;
use tokio::time::Instant;

use voice_assist_core::{Language, SpeechSynthesizer, VoiceInfo};

/// Snapshot of the host's synthesis voices
///
/// Hosts often populate voices some time after startup and may change them
/// later, so the catalog is re-read from the engine on every lookup and
/// polled while it is empty.
#[derive(Debug, Default)]
pub struct VoiceCatalog {
    voices: RwLock<Vec<VoiceInfo>>,
}

impl VoiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Vec<VoiceInfo> {
        self.voices.read().clone()
    }

    /// Re-read voices from the engine
    pub fn refresh(&self, synthesizer: &dyn SpeechSynthesizer) -> usize {
        let voices = synthesizer.voices();
        let count = voices.len();
        *self.voices.write() = voices;
        count
    }

    /// Re-read the engine's voices, polling until some appear or `wait` elapses
    ///
    /// Returns whatever snapshot is available at the deadline, possibly empty.
    pub async fn wait_ready(
        &self,
        synthesizer: &dyn SpeechSynthesizer,
        wait: Duration,
        poll: Duration,
    ) -> Vec<VoiceInfo> {
        let deadline = Instant::now() + wait;
        loop {
            if self.refresh(synthesizer) > 0 {
                break;
            }
            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(
                    engine = synthesizer.name(),
                    wait_ms = wait.as_millis() as u64,
                    "Voice catalog still empty, using engine default voice"
                );
                break;
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }

        self.snapshot()
    }
}

/// Pick a voice for a language
///
/// Locale prefix match first, preferring the host's default voice among
/// those, then a name substring match. `None` means the engine's default
/// voice should be used.
pub fn select_voice(voices: &[VoiceInfo], language: Language) -> Option<&VoiceInfo> {
    let locale_matches: Vec<&VoiceInfo> = voices
        .iter()
        .filter(|v| v.matches_locale(language))
        .collect();

    locale_matches
        .iter()
        .find(|v| v.is_default)
        .or(locale_matches.first())
        .copied()
        .or_else(|| voices.iter().find(|v| v.matches_name(language)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSynthesizer;

    fn catalog() -> Vec<VoiceInfo> {
        vec![
            VoiceInfo::new("1", "Samantha", "en-US"),
            VoiceInfo::new("2", "Lekha", "hi-IN"),
            VoiceInfo::new("3", "Google Hindi", "und"),
        ]
    }

    #[test]
    fn test_locale_match_wins() {
        let voices = catalog();
        assert_eq!(select_voice(&voices, Language::Hindi).unwrap().id, "2");
        assert_eq!(select_voice(&voices, Language::English).unwrap().id, "1");
    }

    #[test]
    fn test_name_match_fallback() {
        let voices = vec![
            VoiceInfo::new("a", "Alex", "fr-FR"),
            VoiceInfo::new("b", "Microsoft Hindi Female", "x-default"),
        ];
        assert_eq!(select_voice(&voices, Language::Hindi).unwrap().id, "b");
        assert!(select_voice(&voices, Language::English).is_none());
    }

    #[test]
    fn test_host_default_preferred_within_locale() {
        let mut voices = vec![
            VoiceInfo::new("uk", "Daniel", "en-GB"),
            VoiceInfo::new("us", "Samantha", "en-US"),
            VoiceInfo::new("hi", "Lekha", "hi-IN"),
        ];
        voices[1].is_default = true;
        assert_eq!(select_voice(&voices, Language::English).unwrap().id, "us");

        // A default voice in another language does not override a locale match
        voices[1].is_default = false;
        voices[2].is_default = true;
        assert_eq!(select_voice(&voices, Language::English).unwrap().id, "uk");
    }

    #[test]
    fn test_empty_catalog_uses_default() {
        assert!(select_voice(&[], Language::Hindi).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_ready_picks_up_late_voices() {
        let synth = ScriptedSynthesizer::new()
            .with_voices(catalog())
            .with_voices_after(Duration::from_millis(450));
        let catalog = VoiceCatalog::new();

        let start = Instant::now();
        let voices = catalog
            .wait_ready(&synth, Duration::from_secs(3), Duration::from_millis(100))
            .await;

        assert_eq!(voices.len(), 3);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_ready_gives_up_after_wait() {
        let synth = ScriptedSynthesizer::new();
        let catalog = VoiceCatalog::new();

        let start = Instant::now();
        let voices = catalog
            .wait_ready(&synth, Duration::from_secs(3), Duration::from_millis(100))
            .await;

        assert!(voices.is_empty());
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert!(start.elapsed() < Duration::from_millis(3200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_ready_sees_changed_voices() {
        let synth = ScriptedSynthesizer::new().with_voices(catalog());
        let catalog = VoiceCatalog::new();

        let first = catalog
            .wait_ready(&synth, Duration::from_secs(3), Duration::from_millis(100))
            .await;
        assert_eq!(first.len(), 3);

        synth.set_voices(vec![VoiceInfo::new("9", "Kalpana", "hi-IN")]);
        let second = catalog
            .wait_ready(&synth, Duration::from_secs(3), Duration::from_millis(100))
            .await;
        assert_eq!(second.len(), 1);
        assert_eq!(select_voice(&second, Language::Hindi).unwrap().id, "9");
    }
}
