//! Host engine implementations

mod console;

pub use console::{ConsoleLines, ConsoleRecognizer, ConsoleSynthesizer};
