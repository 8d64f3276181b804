//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::endpoints;
use crate::{ConfigError, DialogConfig, DialogPrompts, SpeechConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Speech output/input timing
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Dialog protocol
    #[serde(default)]
    pub dialog: DialogConfig,

    /// Question-simplification service
    #[serde(default)]
    pub question_service: QuestionServiceConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_speech()?;
        self.validate_dialog()?;
        self.validate_question_service()?;
        Ok(())
    }

    fn validate_speech(&self) -> Result<(), ConfigError> {
        let output = &self.speech.output;
        let input = &self.speech.input;

        if output.min_fallback_ms == 0 {
            return Err(ConfigError::invalid(
                "speech.output.min_fallback_ms",
                "Fallback floor must be positive, otherwise speech is cut off immediately",
            ));
        }

        if input.watchdog_ms == 0 {
            return Err(ConfigError::invalid(
                "speech.input.watchdog_ms",
                "Watchdog must be positive",
            ));
        }

        if input.countdown_secs == 0 {
            return Err(ConfigError::invalid(
                "speech.input.countdown_secs",
                "Countdown must be at least 1 second",
            ));
        }

        if u64::from(input.countdown_secs) * 1000 > input.watchdog_ms {
            return Err(ConfigError::invalid(
                "speech.input.countdown_secs",
                format!(
                    "Countdown ({}s) must not outlast the watchdog ({}ms)",
                    input.countdown_secs, input.watchdog_ms
                ),
            ));
        }

        Ok(())
    }

    fn validate_dialog(&self) -> Result<(), ConfigError> {
        let dialog = &self.dialog;

        if dialog.max_attempts == 0 {
            return Err(ConfigError::invalid(
                "dialog.max_attempts",
                "At least one attempt is required",
            ));
        }

        if dialog.next_screen.trim().is_empty() {
            return Err(ConfigError::invalid(
                "dialog.next_screen",
                "Next screen must be set",
            ));
        }

        if let Some(path) = &dialog.prompts_path {
            if !std::path::Path::new(path).is_file() {
                if self.environment.is_strict() {
                    return Err(ConfigError::FileNotFound(path.clone()));
                }
                tracing::warn!(path = %path, "Prompts file not found, using built-in prompts");
            }
        }

        Ok(())
    }

    fn validate_question_service(&self) -> Result<(), ConfigError> {
        let service = &self.question_service;

        if !service.base_url.starts_with("http://") && !service.base_url.starts_with("https://") {
            return Err(ConfigError::invalid(
                "question_service.base_url",
                format!("Expected an http(s) URL, got '{}'", service.base_url),
            ));
        }

        if service.timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "question_service.timeout_ms",
                "Timeout must be positive",
            ));
        }

        Ok(())
    }

    /// Prompts from `dialog.prompts_path`, or the built-in defaults
    pub fn load_prompts(&self) -> Result<DialogPrompts, ConfigError> {
        match &self.dialog.prompts_path {
            Some(path) if std::path::Path::new(path).is_file() => {
                Ok(DialogPrompts::load(path)?)
            }
            _ => Ok(DialogPrompts::default()),
        }
    }
}

/// Question-simplification service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionServiceConfig {
    /// Base URL
    #[serde(default = "default_question_base_url")]
    pub base_url: String,

    /// Route for question simplification
    #[serde(default = "default_question_path")]
    pub path: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_question_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_question_base_url() -> String {
    endpoints::QUESTION_SERVICE_DEFAULT.to_string()
}

fn default_question_path() -> String {
    endpoints::ASK_QUESTION_PATH.to_string()
}

fn default_question_timeout_ms() -> u64 {
    endpoints::QUESTION_TIMEOUT_MS
}

impl Default for QuestionServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_question_base_url(),
            path: default_question_path(),
            timeout_ms: default_question_timeout_ms(),
        }
    }
}

impl QuestionServiceConfig {
    /// Full URL of the simplification route
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable metrics
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Metrics port
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_port() -> u16 {
    endpoints::METRICS_PORT
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: false,
            metrics_port: default_metrics_port(),
        }
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env}.* > config/default.* > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Load settings from a specific config directory
pub fn load_settings_from(config_dir: &str, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name(&format!("{}/default", config_dir)).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder
            .add_source(File::with_name(&format!("{}/{}", config_dir, env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("VOICE_ASSIST")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use voice_assist_core::{InteractionMode, Language};

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.dialog.max_attempts, 3);
        assert_eq!(settings.dialog.grace_ms, 1500);
        assert_eq!(settings.dialog.next_screen, "form-selection");
        assert_eq!(settings.dialog.fallback_mode, InteractionMode::Voice);
        assert_eq!(settings.speech.output.voice_wait_ms, 3000);
        assert_eq!(settings.speech.input.watchdog_ms, 12_000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_dialog_validation() {
        let mut settings = Settings::default();
        settings.dialog.max_attempts = 0;
        assert!(settings.validate().is_err());

        settings.dialog.max_attempts = 3;
        settings.dialog.next_screen = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_countdown_must_fit_watchdog() {
        let mut settings = Settings::default();
        settings.speech.input.countdown_secs = 13;
        assert!(settings.validate_speech().is_err());

        settings.speech.input.countdown_secs = 12;
        assert!(settings.validate_speech().is_ok());
    }

    #[test]
    fn test_question_service_url() {
        let mut config = QuestionServiceConfig::default();
        assert_eq!(config.url(), "http://localhost:5000/ask-question");

        config.base_url = "http://127.0.0.1:8000/".to_string();
        config.path = "ask-question".to_string();
        assert_eq!(config.url(), "http://127.0.0.1:8000/ask-question");
    }

    #[test]
    fn test_question_service_validation() {
        let mut settings = Settings::default();
        settings.question_service.base_url = "localhost:5000".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_prompts_file_is_strict_in_production() {
        let mut settings = Settings::default();
        settings.dialog.prompts_path = Some("/nonexistent/prompts.yaml".to_string());
        assert!(settings.validate().is_ok());

        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.yaml")).unwrap();
        writeln!(
            file,
            "dialog:\n  grace_ms: 500\n  initial_language: hindi\nspeech:\n  input:\n    watchdog_ms: 15000"
        )
        .unwrap();

        let settings = load_settings_from(dir.path().to_str().unwrap(), None).unwrap();
        assert_eq!(settings.dialog.grace_ms, 500);
        assert_eq!(settings.dialog.initial_language, Language::Hindi);
        assert_eq!(settings.speech.input.watchdog_ms, 15_000);
        // Untouched sections keep defaults
        assert_eq!(settings.dialog.max_attempts, 3);
    }

    #[test]
    fn test_load_prompts_defaults_without_path() {
        let settings = Settings::default();
        let prompts = settings.load_prompts().unwrap();
        assert_eq!(
            prompts.language_question.get(Language::English),
            "Which language do you prefer? Say English or Hindi."
        );
    }
}
