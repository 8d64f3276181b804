//! Terminal host engines
//!
//! Prompts are printed instead of played, and a "spoken" reply is one line
//! typed on stdin. A blank line behaves like a recognizer that stopped on
//! silence.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use voice_assist_core::{
    Language, RecognitionEvent, Result, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent,
    SynthesisRequest, VoiceInfo,
};

/// Shared line reader over stdin
///
/// One reader for the whole process, so buffered input is never split
/// between consumers.
#[derive(Clone)]
pub struct ConsoleLines {
    lines: Arc<tokio::sync::Mutex<Lines<BufReader<Stdin>>>>,
}

impl Default for ConsoleLines {
    fn default() -> Self {
        Self::stdin()
    }
}

impl ConsoleLines {
    pub fn stdin() -> Self {
        Self {
            lines: Arc::new(tokio::sync::Mutex::new(
                BufReader::new(tokio::io::stdin()).lines(),
            )),
        }
    }

    /// Next line, `None` at end of input
    pub async fn next_line(&self) -> Option<String> {
        match self.lines.lock().await.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stdin");
                None
            }
        }
    }
}

/// Prints utterances to stdout
pub struct ConsoleSynthesizer {
    voices: Vec<VoiceInfo>,
}

impl Default for ConsoleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSynthesizer {
    pub fn new() -> Self {
        let voices = Language::all()
            .iter()
            .map(|lang| {
                VoiceInfo::new(
                    format!("console-{}", lang.code()),
                    format!("Console {}", lang.name()),
                    lang.locale_tag(),
                )
            })
            .collect();
        Self { voices }
    }
}

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    fn speak(&self, request: SynthesisRequest, events: UnboundedSender<SynthesisEvent>) -> Result<()> {
        let _ = events.send(SynthesisEvent::Started);

        let mut out = std::io::stdout().lock();
        let written = writeln!(out, "[{}] {}", request.lang_tag, request.text).and_then(|_| out.flush());

        let _ = match written {
            Ok(()) => events.send(SynthesisEvent::Finished),
            Err(e) => events.send(SynthesisEvent::Error(e.to_string())),
        };
        Ok(())
    }

    fn cancel(&self) {}

    fn name(&self) -> &str {
        "console-tts"
    }
}

/// Reads one stdin line per recognition session
pub struct ConsoleRecognizer {
    lines: ConsoleLines,
    session: Mutex<Option<JoinHandle<()>>>,
}

impl ConsoleRecognizer {
    pub fn new(lines: ConsoleLines) -> Self {
        Self {
            lines,
            session: Mutex::new(None),
        }
    }
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn start(&self, locale: &str, events: UnboundedSender<RecognitionEvent>) -> Result<()> {
        let lines = self.lines.clone();
        let locale = locale.to_string();

        let handle = tokio::spawn(async move {
            let _ = events.send(RecognitionEvent::Started);
            print!("({}) > ", locale);
            let _ = std::io::stdout().flush();

            match lines.next_line().await {
                Some(line) if !line.trim().is_empty() => {
                    let _ = events.send(RecognitionEvent::Result {
                        transcript: line.trim().to_string(),
                        confidence: None,
                    });
                }
                Some(_) => {}
                None => {
                    let _ = events.send(RecognitionEvent::Error {
                        code: "aborted".to_string(),
                    });
                }
            }
            let _ = events.send(RecognitionEvent::Ended);
        });

        if let Some(previous) = self.session.lock().replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    fn stop(&self) {
        if let Some(handle) = self.session.lock().take() {
            handle.abort();
        }
    }

    fn name(&self) -> &str {
        "console-stt"
    }
}
