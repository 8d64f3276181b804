//! Dialog Prompt Configuration
//!
//! Localized prompt tables for the onboarding dialog and the form flow.
//! Templates use `{name}` placeholders.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use voice_assist_core::Language;

/// A string in both supported languages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub english: String,
    pub hindi: String,
}

impl LocalizedText {
    pub fn new(english: impl Into<String>, hindi: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            hindi: hindi.into(),
        }
    }

    /// Text for a language
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Hindi => &self.hindi,
        }
    }

    /// Text for a language with `{key}` placeholders substituted
    pub fn render(&self, language: Language, vars: &[(&str, &str)]) -> String {
        vars.iter()
            .fold(self.get(language).to_string(), |text, (key, value)| {
                text.replace(&format!("{{{}}}", key), value)
            })
    }
}

/// Prompts for the welcome dialog and form flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogPrompts {
    /// Turn 1 prompt
    pub language_question: LocalizedText,
    /// Turn 1 retry prompt
    pub language_retry: LocalizedText,
    /// Spoken after Turn 1, in the selected language. Placeholder: `{language}`
    pub language_confirmation: LocalizedText,
    /// Turn 2 prompt
    pub mode_question: LocalizedText,
    /// Turn 2 retry prompt
    pub mode_retry: LocalizedText,
    /// Final confirmation. Placeholders: `{language}`, `{mode}`
    pub confirmation: LocalizedText,
    /// Spoken by the abort-and-recover path
    pub apology: LocalizedText,
    /// Question used when the simplification service fails. Placeholder: `{field}`
    pub field_fallback: LocalizedText,
    /// Retry prompt while capturing a form answer
    pub field_retry: LocalizedText,
}

impl Default for DialogPrompts {
    fn default() -> Self {
        Self {
            language_question: LocalizedText::new(
                "Which language do you prefer? Say English or Hindi.",
                "आप कौन सी भाषा पसंद करते हैं? इंग्लिश या हिंदी कहें।",
            ),
            language_retry: LocalizedText::new(
                "I did not hear you clearly. Please say English or Hindi again.",
                "मुझे ठीक से सुनाई नहीं दिया। कृपया फिर से इंग्लिश या हिंदी कहें।",
            ),
            language_confirmation: LocalizedText::new(
                "You selected {language}. Alright.",
                "आपने {language} चुना है। ठीक है।",
            ),
            mode_question: LocalizedText::new(
                "Do you want voice assistance or text based help? Say voice or text.",
                "क्या आप आवाज़ सहायता चाहते हैं या पाठ आधारित मदद? आवाज़ या पाठ कहें।",
            ),
            mode_retry: LocalizedText::new(
                "I did not hear you. Please say voice or text.",
                "मुझे नहीं सुना। कृपया आवाज़ या पाठ कहें।",
            ),
            confirmation: LocalizedText::new(
                "Great! You selected {language} with {mode} assistance. Let's begin.",
                "शानदार! आपने {language} और {mode} सहायता चुनी है। चलिए शुरू करते हैं।",
            ),
            apology: LocalizedText::new(
                "There was an issue. Proceeding with default settings.",
                "कुछ समस्या हुई। डिफ़ॉल्ट सेटिंग्स के साथ आगे बढ़ रहे हैं।",
            ),
            field_fallback: LocalizedText::new(
                "Please provide your {field}.",
                "कृपया {field} बताएं।",
            ),
            field_retry: LocalizedText::new(
                "I did not hear you. Please answer again.",
                "मुझे नहीं सुना। कृपया फिर से उत्तर दें।",
            ),
        }
    }
}

impl DialogPrompts {
    /// Load from a YAML file; missing keys keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PromptsConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            PromptsConfigError::FileNotFound(path.as_ref().display().to_string(), e.to_string())
        })?;

        serde_yaml::from_str(&content).map_err(|e| PromptsConfigError::ParseError(e.to_string()))
    }

    /// Deterministic question for a form field
    pub fn field_question(&self, field: &str, language: Language) -> String {
        self.field_fallback.render(language, &[("field", field)])
    }
}

/// Errors when loading prompts
#[derive(Debug, Error)]
pub enum PromptsConfigError {
    #[error("Prompts file not found: {0} ({1})")]
    FileNotFound(String, String),

    #[error("Failed to parse prompts: {0}")]
    ParseError(String),
}
