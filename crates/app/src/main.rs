//! Voice Assistant Console Entry Point

use std::sync::Arc;

use voice_assist_agent::{FormFlow, InMemorySessionStore, QuestionClient, WelcomeDialog};
use voice_assist_app::{init_metrics, init_tracing, onboard, ConsoleNavigator, ConsoleTextInput};
use voice_assist_config::{load_settings, DialogPrompts, FormCatalog, Settings};
use voice_assist_core::{Language, SessionStore};
use voice_assist_pipeline::{
    ConsoleLines, ConsoleRecognizer, ConsoleSynthesizer, CountdownPresenter, SpeechInput,
    SpeechOutput,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("VOICE_ASSIST_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        "Starting voice assistant"
    );

    if let Err(e) = init_metrics(&config) {
        tracing::warn!(error = %e, "Metrics exporter not installed");
    }

    let prompts = config.load_prompts().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load prompts, using built-in prompts");
        DialogPrompts::default()
    });

    let lines = ConsoleLines::stdin();
    let output = Arc::new(SpeechOutput::new(
        Arc::new(ConsoleSynthesizer::new()),
        config.speech.output.clone(),
    ));
    let input = Arc::new(SpeechInput::new(
        Arc::new(ConsoleRecognizer::new(lines.clone())),
        config.speech.input.clone(),
    ));

    let countdown = CountdownPresenter::spawn(input.subscribe(), config.speech.input.countdown_secs);
    let mut remaining = countdown.subscribe();
    tokio::spawn(async move {
        while remaining.changed().await.is_ok() {
            let value = *remaining.borrow();
            if value > 0 {
                tracing::debug!(remaining = value, "Listening countdown");
            }
        }
    });

    let session = Arc::new(InMemorySessionStore::new());
    let navigator = Arc::new(ConsoleNavigator::new());

    let dialog = Arc::new(WelcomeDialog::new(
        output.clone(),
        input.clone(),
        session.clone(),
        navigator.clone(),
        config.dialog.clone(),
        prompts.clone(),
    ));

    println!("Press Enter to start now.");
    let outcome = tokio::select! {
        outcome = onboard(
            dialog,
            async { lines.next_line().await.is_some() },
            config.dialog.start_delay(),
        ) => outcome?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
            return Ok(());
        }
    };

    if let Some(outcome) = &outcome {
        tracing::info!(
            session_id = %outcome.session_id,
            language = %outcome.language,
            mode = %outcome.mode,
            recovered = outcome.recovered,
            screen = ?navigator.current(),
            "Onboarding complete"
        );
    }

    let language = session.language().await?.unwrap_or(Language::English);
    let Some(form_key) = choose_form(&lines, language).await else {
        tracing::info!("No form selected, exiting");
        return Ok(());
    };

    let questions = QuestionClient::new(&config.question_service, prompts.field_fallback.clone())?;
    let flow = FormFlow::new(
        output,
        input,
        session,
        questions,
        Arc::new(ConsoleTextInput::new(lines)),
        config.dialog.clone(),
        prompts,
    );

    let result = flow.run(&form_key).await?;
    println!();
    for (field, answer) in &result.answers {
        println!("{}: {}", field, if answer.is_empty() { "-" } else { answer });
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Print the localized form list and read a choice (number or key)
async fn choose_form(lines: &ConsoleLines, language: Language) -> Option<String> {
    let catalog = FormCatalog::builtin();
    for (i, form) in catalog.forms.iter().enumerate() {
        println!("{}. {}", i + 1, form.title(language));
    }

    let choice = lines.next_line().await?;
    let choice = choice.trim();

    if let Ok(n) = choice.parse::<usize>() {
        return catalog.forms.get(n.checked_sub(1)?).map(|f| f.key.clone());
    }
    catalog.get(choice).map(|f| f.key.clone())
}
