//! Configuration management for the voice assistant
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default.*`, `config/{env}.*`)
//! - Environment variables (VOICE_ASSIST_ prefix, `__` separator)
//!
//! Dialog prompt tables have built-in English/Hindi defaults and can be
//! overridden from a YAML file (`dialog.prompts_path`).

// Centralized timing and endpoint defaults
pub mod constants;
pub mod dialog;
pub mod forms;
pub mod prompts;
pub mod settings;
pub mod speech;

pub use dialog::DialogConfig;
pub use forms::{FormCatalog, FormDefinition};
pub use prompts::{DialogPrompts, LocalizedText, PromptsConfigError};
pub use settings::{
    load_settings, ObservabilityConfig, QuestionServiceConfig, RuntimeEnvironment, Settings,
};
pub use speech::{SpeechConfig, SpeechInputConfig, SpeechOutputConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<PromptsConfigError> for ConfigError {
    fn from(err: PromptsConfigError) -> Self {
        match err {
            PromptsConfigError::FileNotFound(path, _) => ConfigError::FileNotFound(path),
            PromptsConfigError::ParseError(msg) => ConfigError::ParseError(msg),
        }
    }
}

impl From<ConfigError> for voice_assist_core::Error {
    fn from(err: ConfigError) -> Self {
        voice_assist_core::Error::Config(err.to_string())
    }
}
