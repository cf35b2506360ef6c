//! Text capabilities: generation and translation.

pub mod generator;
pub mod translator;

pub use generator::TextGenerator;
pub use translator::Translator;
