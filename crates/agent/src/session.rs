//! In-memory session store
//!
//! Last write wins; lives as long as the process (one browsing session).

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use voice_assist_core::{InteractionMode, Language, Result, SessionStore};

#[derive(Debug, Default, Clone)]
struct SessionData {
    language: Option<Language>,
    mode: Option<InteractionMode>,
    selected_form: Option<String>,
    form_answers: HashMap<String, String>,
}

/// Session store backed by a lock-protected struct
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    data: RwLock<SessionData>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything
    pub fn clear(&self) {
        *self.data.write() = SessionData::default();
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set_language(&self, language: Language) -> Result<()> {
        self.data.write().language = Some(language);
        Ok(())
    }

    async fn language(&self) -> Result<Option<Language>> {
        Ok(self.data.read().language)
    }

    async fn set_interaction_mode(&self, mode: InteractionMode) -> Result<()> {
        self.data.write().mode = Some(mode);
        Ok(())
    }

    async fn interaction_mode(&self) -> Result<Option<InteractionMode>> {
        Ok(self.data.read().mode)
    }

    async fn set_selected_form(&self, form_key: &str) -> Result<()> {
        self.data.write().selected_form = Some(form_key.to_string());
        Ok(())
    }

    async fn selected_form(&self) -> Result<Option<String>> {
        Ok(self.data.read().selected_form.clone())
    }

    async fn set_form_answers(&self, answers: HashMap<String, String>) -> Result<()> {
        self.data.write().form_answers = answers;
        Ok(())
    }

    async fn form_answers(&self) -> Result<HashMap<String, String>> {
        Ok(self.data.read().form_answers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.language().await.unwrap(), None);

        store.set_language(Language::Hindi).await.unwrap();
        store.set_language(Language::English).await.unwrap();
        assert_eq!(store.language().await.unwrap(), Some(Language::English));

        store.set_interaction_mode(InteractionMode::Text).await.unwrap();
        assert_eq!(
            store.interaction_mode().await.unwrap(),
            Some(InteractionMode::Text)
        );
    }

    #[tokio::test]
    async fn test_form_state() {
        let store = InMemorySessionStore::new();
        store.set_selected_form("job-application").await.unwrap();

        let mut answers = HashMap::new();
        answers.insert("Email".to_string(), "a@b.c".to_string());
        store.set_form_answers(answers.clone()).await.unwrap();

        assert_eq!(
            store.selected_form().await.unwrap().as_deref(),
            Some("job-application")
        );
        assert_eq!(store.form_answers().await.unwrap(), answers);

        store.clear();
        assert!(store.form_answers().await.unwrap().is_empty());
    }
}
