//! Interaction mode selected during onboarding

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Language;

/// How the downstream form flow interacts with the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Spoken questions, spoken answers
    #[default]
    Voice,
    /// Text based help
    Text,
}

impl InteractionMode {
    /// Value written to the session store
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Voice => "voice",
            Self::Text => "text",
        }
    }

    /// Label spoken back to the user in the given language
    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Voice, Language::English) => "voice",
            (Self::Text, Language::English) => "text",
            (Self::Voice, Language::Hindi) => "आवाज़",
            (Self::Text, Language::Hindi) => "पाठ",
        }
    }

    /// Parse a stored value
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "voice" => Some(Self::Voice),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
