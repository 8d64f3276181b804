//! Question-simplification client
//!
//! Turns a form field label into a friendlier question via a local HTTP
//! service. Any failure yields the deterministic localized fallback, so
//! `ask` never fails.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use voice_assist_config::{LocalizedText, QuestionServiceConfig};
use voice_assist_core::Language;

use crate::AgentError;

#[derive(Debug, Serialize)]
struct AskQuestionRequest<'a> {
    field_name: &'a str,
    /// "English" or "Hindi"
    language: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskQuestionResponse {
    #[serde(default)]
    simplified_question: Option<String>,
}

/// Client for the `/ask-question` route
pub struct QuestionClient {
    client: Client,
    url: String,
    fallback: LocalizedText,
}

impl QuestionClient {
    /// `fallback` is a template with a `{field}` placeholder
    pub fn new(config: &QuestionServiceConfig, fallback: LocalizedText) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AgentError::QuestionService(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url(),
            fallback,
        })
    }

    /// Question to ask for `field`
    pub async fn ask(&self, field: &str, language: Language) -> String {
        match self.request(field, language).await {
            Ok(question) => question,
            Err(e) => {
                tracing::warn!(field, %language, error = %e, "Question service failed, using fallback");
                self.fallback_question(field, language)
            }
        }
    }

    /// Deterministic question used when the service is unreachable
    pub fn fallback_question(&self, field: &str, language: Language) -> String {
        self.fallback.render(language, &[("field", field)])
    }

    async fn request(&self, field: &str, language: Language) -> Result<String, AgentError> {
        let body = AskQuestionRequest {
            field_name: field,
            language: language.name(),
        };

        let response = self.client.post(&self.url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AgentError::QuestionService(format!("HTTP {}", status)));
        }

        let parsed: AskQuestionResponse = response.json().await?;
        let question = parsed
            .simplified_question
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| field.to_string());

        tracing::debug!(field, question = %question, "Simplified question");
        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use voice_assist_config::DialogPrompts;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> QuestionClient {
        let config = QuestionServiceConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        QuestionClient::new(&config, DialogPrompts::default().field_fallback).unwrap()
    }

    #[tokio::test]
    async fn test_simplified_question() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask-question"))
            .and(body_json(json!({"field_name": "Guardian Contact", "language": "English"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "simplified_question": "What is your guardian's phone number?"
            })))
            .mount(&server)
            .await;

        let question = client(&server.uri())
            .ask("Guardian Contact", Language::English)
            .await;
        assert_eq!(question, "What is your guardian's phone number?");
    }

    #[tokio::test]
    async fn test_hindi_language_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask-question"))
            .and(body_json(json!({"field_name": "पता", "language": "Hindi"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "simplified_question": "आपका पता क्या है?"
            })))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client(&server.uri()).ask("पता", Language::Hindi).await, "आपका पता क्या है?");
    }

    #[tokio::test]
    async fn test_blank_question_uses_field_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"simplified_question": " "})))
            .mount(&server)
            .await;

        assert_eq!(client(&server.uri()).ask("Email", Language::English).await, "Email");
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client(&server.uri());
        assert_eq!(
            client.ask("Email", Language::English).await,
            "Please provide your Email."
        );
        assert_eq!(client.ask("नाम", Language::Hindi).await, "कृपया नाम बताएं।");
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        assert_eq!(
            client(&server.uri()).ask("Phone", Language::English).await,
            "Please provide your Phone."
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        // Nothing listens on port 9 locally
        let client = client("http://127.0.0.1:9");
        assert_eq!(
            client.ask("Address", Language::English).await,
            "Please provide your Address."
        );
    }
}
