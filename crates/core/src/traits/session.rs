//! Session state and navigation collaborators

use async_trait::async_trait;
use std::collections::HashMap;

use crate::{InteractionMode, Language, Result};

/// Session-scoped key-value persistence (last write wins)
///
/// The dialog writes decisions here; downstream screens read them back.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn set_language(&self, language: Language) -> Result<()>;

    async fn language(&self) -> Result<Option<Language>>;

    async fn set_interaction_mode(&self, mode: InteractionMode) -> Result<()>;

    async fn interaction_mode(&self) -> Result<Option<InteractionMode>>;

    async fn set_selected_form(&self, form_key: &str) -> Result<()>;

    async fn selected_form(&self) -> Result<Option<String>>;

    /// Replace the stored answers for the selected form
    async fn set_form_answers(&self, answers: HashMap<String, String>) -> Result<()>;

    /// Stored answers, empty when none were saved
    async fn form_answers(&self) -> Result<HashMap<String, String>>;
}

/// Transfers control to another screen
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, screen: &str) -> Result<()>;
}
