//! Host and collaborator traits
//!
//! - `speech`: the host environment's synthesis and recognition engines
//! - `session`: session-scoped state store and screen navigation

mod session;
mod speech;

pub use session::{Navigator, SessionStore};
pub use speech::{RecognitionEvent, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent};
