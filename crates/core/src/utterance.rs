//! Captured speech

use serde::{Deserialize, Serialize};

use crate::Language;

/// A transcript captured by one listen session
///
/// Lives only for one listen-interpret cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Recognized text, as returned by the engine
    pub transcript: String,
    /// Language the recognizer was configured for
    pub language: Language,
    /// Engine confidence, if reported (0.0 - 1.0)
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl Utterance {
    pub fn new(transcript: impl Into<String>, language: Language) -> Self {
        Self {
            transcript: transcript.into(),
            language,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    /// Whitespace-only transcripts do not count as a reply
    pub fn is_blank(&self) -> bool {
        self.transcript.trim().is_empty()
    }
}
