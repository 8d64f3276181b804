//! Speech output and input configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{speech_input, speech_output};

/// Speech configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpeechConfig {
    #[serde(default)]
    pub output: SpeechOutputConfig,

    #[serde(default)]
    pub input: SpeechInputConfig,
}

/// Speech output (synthesis) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechOutputConfig {
    /// Maximum wait for the voice catalog to populate (ms)
    #[serde(default = "default_voice_wait_ms")]
    pub voice_wait_ms: u64,

    /// Voice catalog poll interval (ms)
    #[serde(default = "default_voice_poll_ms")]
    pub voice_poll_ms: u64,

    /// Settle delay after cancelling a prior utterance (ms)
    #[serde(default = "default_cancel_settle_ms")]
    pub cancel_settle_ms: u64,

    /// Floor of the completion fallback timer (ms)
    #[serde(default = "default_min_fallback_ms")]
    pub min_fallback_ms: u64,

    /// Fallback timer budget per character (ms)
    #[serde(default = "default_fallback_ms_per_char")]
    pub fallback_ms_per_char: u64,

    /// Speech rate
    #[serde(default = "default_unit")]
    pub rate: f32,

    /// Pitch
    #[serde(default = "default_unit")]
    pub pitch: f32,

    /// Volume
    #[serde(default = "default_unit")]
    pub volume: f32,
}

fn default_voice_wait_ms() -> u64 {
    speech_output::VOICE_WAIT_MS
}

fn default_voice_poll_ms() -> u64 {
    speech_output::VOICE_POLL_MS
}

fn default_cancel_settle_ms() -> u64 {
    speech_output::CANCEL_SETTLE_MS
}

fn default_min_fallback_ms() -> u64 {
    speech_output::MIN_FALLBACK_MS
}

fn default_fallback_ms_per_char() -> u64 {
    speech_output::FALLBACK_MS_PER_CHAR
}

fn default_unit() -> f32 {
    1.0
}

impl Default for SpeechOutputConfig {
    fn default() -> Self {
        Self {
            voice_wait_ms: default_voice_wait_ms(),
            voice_poll_ms: default_voice_poll_ms(),
            cancel_settle_ms: default_cancel_settle_ms(),
            min_fallback_ms: default_min_fallback_ms(),
            fallback_ms_per_char: default_fallback_ms_per_char(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl SpeechOutputConfig {
    pub fn voice_wait(&self) -> Duration {
        Duration::from_millis(self.voice_wait_ms)
    }

    pub fn voice_poll(&self) -> Duration {
        Duration::from_millis(self.voice_poll_ms.max(1))
    }

    pub fn cancel_settle(&self) -> Duration {
        Duration::from_millis(self.cancel_settle_ms)
    }

    /// Fallback timer for a text: `max(min_fallback_ms, chars * fallback_ms_per_char)`
    pub fn fallback_for(&self, text: &str) -> Duration {
        let chars = text.chars().count() as u64;
        let estimated = chars.saturating_mul(self.fallback_ms_per_char);
        Duration::from_millis(estimated.max(self.min_fallback_ms))
    }
}

/// Speech input (recognition) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechInputConfig {
    /// Hard watchdog per listen session (ms)
    #[serde(default = "default_watchdog_ms")]
    pub watchdog_ms: u64,

    /// Visible countdown length (seconds)
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,
}

fn default_watchdog_ms() -> u64 {
    speech_input::WATCHDOG_MS
}

fn default_countdown_secs() -> u32 {
    speech_input::COUNTDOWN_SECS
}

impl Default for SpeechInputConfig {
    fn default() -> Self {
        Self {
            watchdog_ms: default_watchdog_ms(),
            countdown_secs: default_countdown_secs(),
        }
    }
}

impl SpeechInputConfig {
    pub fn watchdog(&self) -> Duration {
        Duration::from_millis(self.watchdog_ms)
    }
}
