//! Speech capabilities: recognition and long-audio synthesis.

pub mod recognizer;
pub mod synthesizer;

pub use recognizer::SpeechRecognizer;
pub use synthesizer::{SpeechSynthesizer, VoiceSpec};
