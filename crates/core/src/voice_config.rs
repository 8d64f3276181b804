//! Voice and utterance configuration types for synthesis

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// A synthesis voice exposed by the host environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Host voice identifier
    pub id: String,
    /// Human-readable name (e.g. "Google हिन्दी", "Microsoft Heera - English (India)")
    pub name: String,
    /// BCP-47 locale reported by the host (e.g. "hi-IN", "en_GB")
    pub locale: String,
    /// Host marks this voice as its default
    #[serde(default)]
    pub is_default: bool,
}

impl VoiceInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            locale: locale.into(),
            is_default: false,
        }
    }

    /// Locale starts with the language's ISO code (case-insensitive)
    pub fn matches_locale(&self, language: Language) -> bool {
        self.locale.to_lowercase().starts_with(language.code())
    }

    /// Name contains the language's name hint (case-insensitive)
    pub fn matches_name(&self, language: Language) -> bool {
        self.name.to_lowercase().contains(language.voice_name_hint())
    }
}

/// One utterance handed to the host synthesizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Text to speak
    pub text: String,
    /// Declared language tag, always set as a hint to the engine
    pub lang_tag: String,
    /// Selected voice; `None` lets the engine use its default voice
    #[serde(default)]
    pub voice: Option<VoiceInfo>,
    /// Speech rate (0.5 - 2.0, default 1.0)
    #[serde(default = "default_unit")]
    pub rate: f32,
    /// Pitch (0.0 - 2.0, default 1.0)
    #[serde(default = "default_unit")]
    pub pitch: f32,
    /// Volume (0.0 - 1.0, default 1.0)
    #[serde(default = "default_unit")]
    pub volume: f32,
}

fn default_unit() -> f32 {
    1.0
}

impl SynthesisRequest {
    /// Create a request for text in the given language
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            lang_tag: language.locale_tag().to_string(),
            voice: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }

    /// Set the voice
    pub fn with_voice(mut self, voice: Option<VoiceInfo>) -> Self {
        self.voice = voice;
        self
    }

    /// Set the speech rate
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate.clamp(0.5, 2.0);
        self
    }

    /// Set the pitch
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch.clamp(0.0, 2.0);
        self
    }

    /// Set the volume
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }
}
