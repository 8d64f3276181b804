//! Core traits and types for the voice assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Language and interaction mode definitions (English, Hindi)
//! - Captured utterances
//! - Host speech engine traits (synthesis, recognition)
//! - Session store and navigation collaborator traits
//! - Error types

pub mod error;
pub mod language;
pub mod mode;
pub mod traits;
pub mod utterance;
pub mod voice_config;

pub use error::{Error, Result};
pub use language::Language;
pub use mode::InteractionMode;
pub use utterance::Utterance;
pub use voice_config::{SynthesisRequest, VoiceInfo};

// Trait re-exports
pub use traits::{
    // Collaborators
    Navigator,
    RecognitionEvent,
    SessionStore,
    // Speech
    SpeechRecognizer,
    SpeechSynthesizer,
    SynthesisEvent,
};
