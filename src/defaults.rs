//! Default configuration constants for polyvox.
//!
//! This module provides shared constants used across different pipeline stages
//! to ensure consistency and eliminate duplication.

/// Staging directory (and bucket prefix) for raw input audio.
pub const RAW_AUDIO_DIR: &str = "input_audios";

/// Staging directory (and bucket prefix) for transcripts.
pub const TRANSCRIPT_DIR: &str = "text_prompts";

/// Staging directory (and bucket prefix) for generated paragraphs.
pub const PARAGRAPH_DIR: &str = "text_paragraphs";

/// Staging directory (and bucket prefix) for synthesized English audio.
pub const ENGLISH_AUDIO_DIR: &str = "text_audios";

/// Staging directory (and bucket prefix) for translated text.
pub const TRANSLATED_DIR: &str = "text_translated";

/// Staging directory (and bucket prefix) for synthesized French audio.
pub const FRENCH_AUDIO_DIR: &str = "output_audios";

/// Language hint passed to speech recognition.
pub const RECOGNITION_LANGUAGE: &str = "en-US";

/// Written in place of a transcript when recognition returns no results.
///
/// A silent or unintelligible clip is a valid outcome, not an error; the
/// placeholder keeps the artifact present so the stage is not re-run.
pub const EMPTY_TRANSCRIPT_PLACEHOLDER: &str = "None";

/// Minimum word count requested from the text generator.
pub const GENERATION_TARGET_WORDS: u32 = 1000;

/// Host persona named in the generation prompt.
pub const PODCAST_HOST: &str = "Pavlos Protopapas";

/// Sampling temperature for text generation.
///
/// Near-zero keeps the output deterministic across re-runs of the same
/// transcript.
pub const GENERATION_TEMPERATURE: f32 = 0.01;

/// Source language code for translation.
pub const TRANSLATION_SOURCE: &str = "en";

/// Target language code for translation.
pub const TRANSLATION_TARGET: &str = "fr";

/// Voice language for English synthesis.
pub const EN_VOICE_LANGUAGE: &str = "en-US";

/// Voice name for English synthesis.
pub const EN_VOICE_NAME: &str = "en-US-Standard-B";

/// Voice language for French synthesis.
pub const FR_VOICE_LANGUAGE: &str = "fr-FR";

/// Voice name for French synthesis.
pub const FR_VOICE_NAME: &str = "fr-FR-Standard-C";

/// Audio encoding requested from speech synthesis.
pub const AUDIO_ENCODING: &str = "LINEAR16";

/// Default deadline for a speech recognition operation, in seconds.
pub const RECOGNIZE_TIMEOUT_SECS: u64 = 90;

/// Default deadline for a speech synthesis operation, in seconds.
///
/// Synthesis generates minutes of audio per paragraph and runs much longer
/// than recognition.
pub const SYNTHESIZE_TIMEOUT_SECS: u64 = 300;

/// Interval between polls of a long-running operation, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 2000;

/// Default region for the Vertex and long-audio synthesis endpoints.
pub const DEFAULT_LOCATION: &str = "us-central1";

/// Default text generation model.
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-1.5-flash-001";

/// Environment variable consulted for the API bearer token.
pub const TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";
