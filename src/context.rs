//! Composition root: configuration plus the capability handles every stage
//! needs.
//!
//! One `Context` is built at process start and passed by reference into each
//! stage, so tests can substitute mock collaborators and nothing reaches for
//! global state.

use crate::config::Config;
use crate::error::Result;
use crate::speech::recognizer::{GoogleRecognizer, SpeechRecognizer};
use crate::speech::synthesizer::{GoogleSynthesizer, SpeechSynthesizer};
use crate::storage::{GcsStore, ObjectStore};
use crate::text::generator::{GeminiGenerator, TextGenerator};
use crate::text::translator::{GoogleTranslator, Translator};
use crate::transcode::{FfmpegTranscoder, Transcoder};
use std::path::Path;
use std::sync::Arc;

pub struct Context {
    config: Config,
    pub store: Arc<dyn ObjectStore>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub generator: Arc<dyn TextGenerator>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub transcoder: Arc<dyn Transcoder>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}

impl Context {
    /// Assemble a context from explicit collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        store: Arc<dyn ObjectStore>,
        recognizer: Arc<dyn SpeechRecognizer>,
        generator: Arc<dyn TextGenerator>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        Self {
            config,
            store,
            recognizer,
            generator,
            translator,
            synthesizer,
            transcoder,
        }
    }

    /// Build the production context backed by the Google Cloud services.
    pub fn from_config(config: Config) -> Result<Self> {
        config.require_cloud()?;
        let token = config.gcp.access_token.clone().unwrap_or_default();
        let http = reqwest::Client::new();
        let poll_interval = config.pipeline.poll_interval();

        let store = Arc::new(GcsStore::new(
            http.clone(),
            token.clone(),
            config.gcp.bucket.clone(),
        ));
        let recognizer = Arc::new(GoogleRecognizer::new(
            http.clone(),
            token.clone(),
            poll_interval,
        ));
        let generator = Arc::new(GeminiGenerator::new(
            http.clone(),
            token.clone(),
            config.gcp.project.clone(),
            config.gcp.location.clone(),
            config.gcp.model.clone(),
        ));
        let translator = Arc::new(GoogleTranslator::new(http.clone(), token.clone()));
        let synthesizer = Arc::new(GoogleSynthesizer::new(
            http,
            token,
            config.gcp.project.clone(),
            config.gcp.location.clone(),
            poll_interval,
        ));
        let transcoder = Arc::new(FfmpegTranscoder::system());

        Ok(Self::new(
            config, store, recognizer, generator, translator, synthesizer, transcoder,
        ))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Workspace root holding the staging directories.
    pub fn root(&self) -> &Path {
        &self.config.pipeline.workspace
    }
}
