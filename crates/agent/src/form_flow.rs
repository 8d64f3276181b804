//! Form-filling flow
//!
//! Consumes the language and mode chosen by the welcome dialog. Each field
//! label is turned into a question by the simplification service; in voice
//! mode the question is spoken and the answer captured with the usual retry
//! protocol, in text mode answers come from a `TextInput`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use voice_assist_config::{DialogConfig, DialogPrompts, FormCatalog};
use voice_assist_core::{InteractionMode, SessionStore};
use voice_assist_pipeline::{SpeechInput, SpeechOutput};

use crate::question::QuestionClient;
use crate::turn::{DialogTurn, TurnRunner};
use crate::AgentError;

/// Typed answers for text mode
#[async_trait]
pub trait TextInput: Send + Sync {
    /// Answer for `field`, `None` to leave it empty
    async fn read_answer(&self, field: &str, question: &str) -> Option<String>;
}

/// Answers collected for one form, in field order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAnswers {
    pub form_key: String,
    pub answers: Vec<(String, String)>,
}

impl FormAnswers {
    /// Fields left empty
    pub fn unanswered(&self) -> impl Iterator<Item = &str> {
        self.answers
            .iter()
            .filter(|(_, answer)| answer.is_empty())
            .map(|(field, _)| field.as_str())
    }
}

fn trimmed(transcript: &str) -> String {
    transcript.trim().to_string()
}

/// Form flow
pub struct FormFlow {
    output: Arc<SpeechOutput>,
    input: Arc<SpeechInput>,
    session: Arc<dyn SessionStore>,
    questions: QuestionClient,
    text_input: Arc<dyn TextInput>,
    config: DialogConfig,
    prompts: DialogPrompts,
    catalog: &'static FormCatalog,
}

impl FormFlow {
    pub fn new(
        output: Arc<SpeechOutput>,
        input: Arc<SpeechInput>,
        session: Arc<dyn SessionStore>,
        questions: QuestionClient,
        text_input: Arc<dyn TextInput>,
        config: DialogConfig,
        prompts: DialogPrompts,
    ) -> Self {
        Self {
            output,
            input,
            session,
            questions,
            text_input,
            config,
            prompts,
            catalog: FormCatalog::builtin(),
        }
    }

    /// Fill in `form_key` and persist the answers
    pub async fn run(&self, form_key: &str) -> Result<FormAnswers, AgentError> {
        let form = self
            .catalog
            .get(form_key)
            .ok_or_else(|| AgentError::UnknownForm(form_key.to_string()))?;

        self.session.set_selected_form(form_key).await?;

        let language = self
            .session
            .language()
            .await?
            .unwrap_or(self.config.fallback_language);
        let mode = self
            .session
            .interaction_mode()
            .await?
            .unwrap_or(self.config.fallback_mode);

        tracing::info!(form = form_key, %language, %mode, "Form flow started");

        let runner = TurnRunner::new(
            &self.output,
            &self.input,
            self.config.max_attempts,
            self.config.grace(),
        );

        let mut answers = Vec::new();
        for field in form.fields(language) {
            let question = self.questions.ask(field, language).await;

            let answer = match mode {
                InteractionMode::Voice => runner
                    .run(DialogTurn {
                        name: "form_field",
                        language,
                        prompt: question,
                        retry_prompt: self.prompts.field_retry.get(language).to_string(),
                        interpret: trimmed,
                        fallback: Some(String::new()),
                    })
                    .await
                    .into_value()
                    .unwrap_or_default(),
                InteractionMode::Text => self
                    .text_input
                    .read_answer(field, &question)
                    .await
                    .map(|a| a.trim().to_string())
                    .unwrap_or_default(),
            };

            tracing::debug!(field = %field, answered = !answer.is_empty(), "Field captured");
            answers.push((field.clone(), answer));
        }

        let stored: HashMap<String, String> = answers.iter().cloned().collect();
        self.session.set_form_answers(stored).await?;

        Ok(FormAnswers {
            form_key: form_key.to_string(),
            answers,
        })
    }
}
