//! Error types shared across crates

use thiserror::Error;

/// Result alias using the core error
pub type Result<T> = std::result::Result<T, Error>;

/// Core errors
///
/// Crate-specific errors (pipeline, agent, config) convert into this type at
/// crate boundaries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Host speech engine failed to start or rejected a request
    #[error("Speech engine error: {0}")]
    Engine(String),

    /// Speech pipeline error (listen/speak)
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Session store read/write failed
    #[error("Session store error: {0}")]
    Session(String),

    /// Screen transition failed
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Convenience constructor for engine errors
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Convenience constructor for session store errors
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }
}
