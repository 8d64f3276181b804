//! Prompt, listen, interpret, retry
//!
//! Every question the assistant asks runs through `TurnRunner::run`:
//!
//! 1. speak the prompt
//! 2. wait the grace period
//! 3. listen
//! 4. a failed or blank capture counts as an attempt; while attempts remain
//!    speak the retry prompt and go to 2
//! 5. a transcript is interpreted and the turn ends
//!
//! On exhaustion the turn's fallback value is applied, or, when it has none,
//! the turn reports `Exhausted` and the caller decides how to escalate.

use std::time::Duration;

use voice_assist_core::Language;
use voice_assist_pipeline::{SpeechInput, SpeechOutput};

/// One prompt-then-listen question
pub struct DialogTurn<T> {
    /// Name used in logs and metrics
    pub name: &'static str,
    /// Language for speaking the prompts and recognizing the reply
    pub language: Language,
    pub prompt: String,
    pub retry_prompt: String,
    /// Maps a non-blank transcript to a value
    pub interpret: fn(&str) -> T,
    /// Value applied when attempts are exhausted; `None` escalates
    pub fallback: Option<T>,
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome<T> {
    Answered {
        value: T,
        transcript: String,
        attempts: u32,
    },
    FellBack {
        value: T,
        attempts: u32,
    },
    Exhausted {
        attempts: u32,
    },
}

impl<T> TurnOutcome<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Answered { attempts, .. }
            | Self::FellBack { attempts, .. }
            | Self::Exhausted { attempts } => *attempts,
        }
    }

    /// Committed value, if any
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Answered { value, .. } | Self::FellBack { value, .. } => Some(value),
            Self::Exhausted { .. } => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Answered { .. } => "answered",
            Self::FellBack { .. } => "fallback",
            Self::Exhausted { .. } => "exhausted",
        }
    }
}

/// Runs turns against the speech services
pub struct TurnRunner<'a> {
    output: &'a SpeechOutput,
    input: &'a SpeechInput,
    max_attempts: u32,
    grace: Duration,
}

impl<'a> TurnRunner<'a> {
    pub fn new(
        output: &'a SpeechOutput,
        input: &'a SpeechInput,
        max_attempts: u32,
        grace: Duration,
    ) -> Self {
        Self {
            output,
            input,
            max_attempts: max_attempts.max(1),
            grace,
        }
    }

    pub async fn run<T>(&self, turn: DialogTurn<T>) -> TurnOutcome<T> {
        let outcome = self.run_attempts(turn).await;
        metrics::counter!(
            "dialog_turn_total",
            "turn" => outcome.0,
            "outcome" => outcome.1.label()
        )
        .increment(1);
        outcome.1
    }

    async fn run_attempts<T>(&self, turn: DialogTurn<T>) -> (&'static str, TurnOutcome<T>) {
        let DialogTurn {
            name,
            language,
            prompt,
            retry_prompt,
            interpret,
            fallback,
        } = turn;

        self.output.speak(&prompt, language).await;

        let mut attempts = 0;
        loop {
            tokio::time::sleep(self.grace).await;
            attempts += 1;

            match self.input.listen(language).await {
                Ok(utterance) if !utterance.is_blank() => {
                    let value = interpret(&utterance.transcript);
                    tracing::info!(
                        turn = name,
                        attempts,
                        transcript = %utterance.transcript,
                        "Turn answered"
                    );
                    return (
                        name,
                        TurnOutcome::Answered {
                            value,
                            transcript: utterance.transcript,
                            attempts,
                        },
                    );
                }
                Ok(_) => tracing::debug!(turn = name, attempts, "Blank transcript"),
                Err(e) => tracing::debug!(turn = name, attempts, error = %e, "Listen failed"),
            }

            if attempts >= self.max_attempts {
                break;
            }
            self.output.speak(&retry_prompt, language).await;
        }

        let outcome = match fallback {
            Some(value) => {
                tracing::info!(turn = name, attempts, "Attempts exhausted, using fallback");
                TurnOutcome::FellBack { value, attempts }
            }
            None => {
                tracing::warn!(turn = name, attempts, "Attempts exhausted");
                TurnOutcome::Exhausted { attempts }
            }
        };
        (name, outcome)
    }
}
