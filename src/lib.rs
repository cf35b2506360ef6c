//! polyvox - cloud podcast localization pipeline
//!
//! Downloads raw audio from a storage bucket, transcribes it, expands the
//! transcripts into long-form podcast scripts, synthesizes English speech,
//! translates the scripts to French, and synthesizes French speech — moving
//! artifacts between the bucket and local staging directories at every step.
//! Each stage skips work whose output already exists, so re-running after a
//! failure resumes where the last run stopped.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod context;
pub mod defaults;
pub mod diagnostics;
pub mod error;
pub(crate) mod gcp;
pub mod pipeline;
pub mod speech;
pub mod storage;
pub mod text;
pub mod transcode;

// Core capability traits (one external service each)
pub use speech::recognizer::SpeechRecognizer;
pub use speech::synthesizer::{SpeechSynthesizer, VoiceSpec};
pub use storage::ObjectStore;
pub use text::generator::TextGenerator;
pub use text::translator::Translator;
pub use transcode::Transcoder;

// Pipeline
pub use artifact::{Artifact, ArtifactClass};
pub use context::Context;

// Error handling
pub use error::{PolyvoxError, Result};

// Config
pub use config::Config;
