//! Dialog orchestration configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use voice_assist_core::{InteractionMode, Language};

use crate::constants::dialog;

/// Dialog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    /// Attempts per turn before fallback/escalation
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause after each prompt before listening (ms)
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,

    /// Pause after confirmations (ms)
    #[serde(default = "default_confirmation_pause_ms")]
    pub confirmation_pause_ms: u64,

    /// Delay applied to the page-load trigger (ms)
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,

    /// Screen to navigate to once onboarding finishes
    #[serde(default = "default_next_screen")]
    pub next_screen: String,

    /// Language used for the first prompt
    #[serde(default)]
    pub initial_language: Language,

    /// Language forced by the abort-and-recover path
    #[serde(default)]
    pub fallback_language: Language,

    /// Mode applied when the mode turn is exhausted, and by recovery
    #[serde(default)]
    pub fallback_mode: InteractionMode,

    /// Optional YAML file overriding the built-in prompts
    #[serde(default)]
    pub prompts_path: Option<String>,
}

fn default_max_attempts() -> u32 {
    dialog::MAX_ATTEMPTS
}

fn default_grace_ms() -> u64 {
    dialog::GRACE_MS
}

fn default_confirmation_pause_ms() -> u64 {
    dialog::CONFIRMATION_PAUSE_MS
}

fn default_start_delay_ms() -> u64 {
    dialog::START_DELAY_MS
}

fn default_next_screen() -> String {
    dialog::NEXT_SCREEN.to_string()
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            grace_ms: default_grace_ms(),
            confirmation_pause_ms: default_confirmation_pause_ms(),
            start_delay_ms: default_start_delay_ms(),
            next_screen: default_next_screen(),
            initial_language: Language::English,
            fallback_language: Language::English,
            fallback_mode: InteractionMode::Voice,
            prompts_path: None,
        }
    }
}

impl DialogConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }

    pub fn confirmation_pause(&self) -> Duration {
        Duration::from_millis(self.confirmation_pause_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}
