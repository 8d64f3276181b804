//! Centralized constants for the voice assistant
//!
//! Single source of truth for timing defaults and endpoints. Config structs
//! use these as their serde defaults.

/// Speech output (synthesis) timing
pub mod speech_output {
    /// Maximum wait for the host voice catalog to populate
    pub const VOICE_WAIT_MS: u64 = 3000;

    /// Poll interval while waiting for voices
    pub const VOICE_POLL_MS: u64 = 100;

    /// Delay between cancelling a prior utterance and starting the next
    pub const CANCEL_SETTLE_MS: u64 = 50;

    /// Floor of the completion fallback timer
    pub const MIN_FALLBACK_MS: u64 = 2000;

    /// Fallback timer budget per character of text
    pub const FALLBACK_MS_PER_CHAR: u64 = 60;
}

/// Speech input (recognition) timing
pub mod speech_input {
    /// Hard watchdog for one listen session
    pub const WATCHDOG_MS: u64 = 12_000;

    /// Visible countdown length (cosmetic, shorter than the watchdog)
    pub const COUNTDOWN_SECS: u32 = 10;
}

/// Dialog protocol
pub mod dialog {
    /// Attempts per turn before fallback/escalation
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Pause after a prompt so the user can start speaking
    pub const GRACE_MS: u64 = 1500;

    /// Pause after confirmations (and the apology) before moving on
    pub const CONFIRMATION_PAUSE_MS: u64 = 1000;

    /// Delay before the page-load trigger starts the dialog
    pub const START_DELAY_MS: u64 = 1000;

    /// Screen shown after onboarding
    pub const NEXT_SCREEN: &str = "form-selection";
}

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Question-simplification service
    pub const QUESTION_SERVICE_DEFAULT: &str = "http://localhost:5000";

    /// Question-simplification route
    pub const ASK_QUESTION_PATH: &str = "/ask-question";

    /// Request timeout for the question service
    pub const QUESTION_TIMEOUT_MS: u64 = 10_000;

    /// Prometheus exporter port
    pub const METRICS_PORT: u16 = 9090;
}
