//! Console host wiring
//!
//! Collaborators for running the assistant in a terminal plus the logging and
//! metrics bootstrap used by the binary.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use voice_assist_agent::{DialogOutcome, TextInput, TriggerSource, WelcomeDialog};
use voice_assist_config::Settings;
use voice_assist_core::{Navigator, Result};
use voice_assist_pipeline::ConsoleLines;

/// Records the current screen and logs transitions
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    current: RwLock<Option<String>>,
}

impl ConsoleNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.current.read().clone()
    }
}

#[async_trait]
impl Navigator for ConsoleNavigator {
    async fn navigate(&self, screen: &str) -> Result<()> {
        tracing::info!(screen, "Navigating");
        *self.current.write() = Some(screen.to_string());
        Ok(())
    }
}

/// Typed answers from stdin
pub struct ConsoleTextInput {
    lines: ConsoleLines,
}

impl ConsoleTextInput {
    pub fn new(lines: ConsoleLines) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl TextInput for ConsoleTextInput {
    async fn read_answer(&self, field: &str, question: &str) -> Option<String> {
        println!("{}", question);
        print!("{}: ", field);
        let _ = std::io::Write::flush(&mut std::io::stdout());

        self.lines
            .next_line()
            .await
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
    }
}

/// Fire the page-load trigger, and the user-action trigger if `user_action`
/// resolves `true` before the page-load delay is over
///
/// Whichever claims the dialog first runs it; the other is a no-op.
pub async fn onboard<F>(
    dialog: Arc<WelcomeDialog>,
    user_action: F,
    delay: Duration,
) -> std::result::Result<Option<DialogOutcome>, JoinError>
where
    F: Future<Output = bool>,
{
    let load = tokio::spawn({
        let dialog = dialog.clone();
        async move { dialog.trigger(TriggerSource::PageLoad).await }
    });

    let acted = tokio::select! {
        acted = user_action => acted,
        _ = tokio::time::sleep(delay) => false,
    };
    let by_user = if acted {
        dialog.trigger(TriggerSource::UserAction).await
    } else {
        None
    };

    Ok(by_user.or(load.await?))
}

/// Initialize tracing from observability settings
///
/// `RUST_LOG` takes precedence over `observability.log_level`.
pub fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("voice_assist={},warn", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}

/// Install the Prometheus exporter when metrics are enabled
pub fn init_metrics(config: &Settings) -> std::result::Result<(), String> {
    if !config.observability.metrics_enabled {
        return Ok(());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| e.to_string())?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_assist_agent::InMemorySessionStore;
    use voice_assist_config::{DialogConfig, DialogPrompts, SpeechInputConfig, SpeechOutputConfig};
    use voice_assist_pipeline::testing::{ScriptedRecognizer, ScriptedSynthesizer};
    use voice_assist_pipeline::{SpeechInput, SpeechOutput};

    fn dialog(recognizer: Arc<ScriptedRecognizer>) -> Arc<WelcomeDialog> {
        Arc::new(WelcomeDialog::new(
            Arc::new(SpeechOutput::new(
                Arc::new(ScriptedSynthesizer::new()),
                SpeechOutputConfig::default(),
            )),
            Arc::new(SpeechInput::new(recognizer, SpeechInputConfig::default())),
            Arc::new(InMemorySessionStore::new()),
            Arc::new(ConsoleNavigator::new()),
            DialogConfig::default(),
            DialogPrompts::default(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_onboard_starts_on_page_load_without_key() {
        let recognizer = Arc::new(ScriptedRecognizer::transcripts(["english", "voice"]));
        let delay = DialogConfig::default().start_delay();

        let outcome = onboard(dialog(recognizer.clone()), std::future::pending(), delay)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome.trigger, TriggerSource::PageLoad);
        assert_eq!(recognizer.sessions(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_onboard_key_during_delay_runs_once() {
        let recognizer = Arc::new(ScriptedRecognizer::transcripts(["hindi", "text"]));
        let delay = DialogConfig::default().start_delay();

        let key = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            true
        };
        let outcome = onboard(dialog(recognizer.clone()), key, delay)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome.trigger, TriggerSource::UserAction);
        // The page-load trigger found the dialog claimed and did nothing
        assert_eq!(recognizer.sessions(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_onboard_key_at_end_of_input_is_ignored() {
        let recognizer = Arc::new(ScriptedRecognizer::transcripts(["english", "voice"]));
        let delay = DialogConfig::default().start_delay();

        let outcome = onboard(dialog(recognizer.clone()), async { false }, delay)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome.trigger, TriggerSource::PageLoad);
    }

    #[tokio::test]
    async fn test_navigator_tracks_current_screen() {
        let navigator = ConsoleNavigator::new();
        assert_eq!(navigator.current(), None);

        navigator.navigate("form-selection").await.unwrap();
        assert_eq!(navigator.current().as_deref(), Some("form-selection"));
    }

    #[test]
    fn test_metrics_disabled_is_noop() {
        let settings = Settings::default();
        assert!(init_metrics(&settings).is_ok());
    }
}
