//! Transcript classification
//!
//! Literal substring tests over a small fixed vocabulary. A transcript that
//! does not name the first option selects the second.

use voice_assist_core::{InteractionMode, Language};

/// Any of these selects Hindi
pub const HINDI_KEYWORDS: &[&str] = &["hindi", "हिंदी"];

/// Any of these selects voice mode
pub const VOICE_KEYWORDS: &[&str] = &["voice", "आवाज़", "आवाज"];

fn contains_any(transcript: &str, keywords: &[&str]) -> bool {
    let lowered = transcript.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}

/// Hindi if the transcript names it, otherwise English
pub fn classify_language(transcript: &str) -> Language {
    if contains_any(transcript, HINDI_KEYWORDS) {
        Language::Hindi
    } else {
        Language::English
    }
}

/// Voice if the transcript names it, otherwise Text
pub fn classify_mode(transcript: &str) -> InteractionMode {
    if contains_any(transcript, VOICE_KEYWORDS) {
        InteractionMode::Voice
    } else {
        InteractionMode::Text
    }
}
