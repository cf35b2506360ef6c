//! Text-to-speech behind a trait.
//!
//! Long-audio synthesis never returns bytes: the service writes the finished
//! audio straight to the requested storage location. Callers therefore gate
//! on remote existence, not on a local output file.

use crate::defaults;
use crate::error::{PolyvoxError, Result};
use crate::gcp;
use crate::storage::MemoryStore;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const OPERATION: &str = "speech synthesis";

/// Voice parameters for one synthesis target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceSpec {
    pub language_code: &'static str,
    pub name: &'static str,
}

/// Trait for long-audio speech synthesis.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the given voice into the remote object at
    /// `output_uri` (a `gs://bucket/object` location). The service runs this
    /// as a long-running operation; `timeout` bounds how long the caller
    /// waits.
    async fn synthesize_to_object(
        &self,
        text: &str,
        voice: &VoiceSpec,
        output_uri: &str,
        timeout: Duration,
    ) -> Result<()>;
}

/// Synthesis over the Cloud Text-to-Speech long-audio REST API.
pub struct GoogleSynthesizer {
    http: reqwest::Client,
    token: String,
    project: String,
    location: String,
    endpoint: String,
    poll_interval: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    audio_config: AudioConfig<'a>,
    voice: VoiceSelection<'a>,
    output_gcs_uri: &'a str,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig<'a> {
    audio_encoding: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

impl GoogleSynthesizer {
    pub fn new(
        http: reqwest::Client,
        token: impl Into<String>,
        project: impl Into<String>,
        location: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        let location = location.into();
        let endpoint = format!("https://{location}-texttospeech.googleapis.com");
        Self {
            http,
            token: token.into(),
            project: project.into(),
            location,
            endpoint,
            poll_interval,
        }
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSynthesizer {
    async fn synthesize_to_object(
        &self,
        text: &str,
        voice: &VoiceSpec,
        output_uri: &str,
        timeout: Duration,
    ) -> Result<()> {
        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            audio_config: AudioConfig {
                audio_encoding: defaults::AUDIO_ENCODING,
            },
            voice: VoiceSelection {
                language_code: voice.language_code,
                name: voice.name,
            },
            output_gcs_uri: output_uri,
        };

        let response = self
            .http
            .post(format!(
                "{}/v1/projects/{}/locations/{}:synthesizeLongAudio",
                self.endpoint, self.project, self.location
            ))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        let response = gcp::expect_success(response, OPERATION).await?;
        let operation: gcp::Operation = response.json().await?;

        let operation_url = format!("{}/v1/{}", self.endpoint, operation.name);
        gcp::await_operation(
            &self.http,
            &self.token,
            &operation_url,
            OPERATION,
            timeout,
            self.poll_interval,
        )
        .await?;
        // The audio lands in the bucket; there is nothing to return.
        Ok(())
    }
}

/// Mock synthesizer for testing.
///
/// Optionally emulates the service's side effect by writing placeholder
/// bytes into a [`MemoryStore`] at the requested object.
#[derive(Debug, Default)]
pub struct MockSynthesizer {
    sink: Option<Arc<MemoryStore>>,
    uris: Mutex<Vec<String>>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emulate the remote write by storing placeholder bytes in `store`.
    pub fn with_sink(mut self, store: Arc<MemoryStore>) -> Self {
        self.sink = Some(store);
        self
    }

    /// Configure the mock to fail
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of synthesize invocations so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Output URIs requested so far
    pub fn uris(&self) -> Vec<String> {
        self.uris
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize_to_object(
        &self,
        _text: &str,
        _voice: &VoiceSpec,
        output_uri: &str,
        _timeout: Duration,
    ) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.uris
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(output_uri.to_string());
        if self.should_fail {
            return Err(PolyvoxError::Api {
                operation: OPERATION.to_string(),
                message: "mock synthesis failure".to_string(),
            });
        }
        if let Some(store) = &self.sink
            && let Some(object) = output_uri
                .strip_prefix("gs://")
                .and_then(|rest| rest.split_once('/'))
                .map(|(_bucket, object)| object)
        {
            store.put(object, b"synthesized-audio");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOICE: VoiceSpec = VoiceSpec {
        language_code: "en-US",
        name: "en-US-Standard-B",
    };

    #[tokio::test]
    async fn test_synthesize_posts_request_and_polls() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("POST", "/v1/projects/demo/locations/us-central1:synthesizeLongAudio")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "audioConfig": {"audioEncoding": "LINEAR16"},
                "voice": {"languageCode": "en-US", "name": "en-US-Standard-B"},
                "outputGcsUri": "gs://demo-bucket/text_audios/input-1.mp3"
            })))
            .with_status(200)
            .with_body(r#"{"name": "operations/synth-1"}"#)
            .create_async()
            .await;
        let _poll = server
            .mock("GET", "/v1/operations/synth-1")
            .with_status(200)
            .with_body(r#"{"done": true}"#)
            .create_async()
            .await;

        let synthesizer = GoogleSynthesizer::new(
            reqwest::Client::new(),
            "token",
            "demo",
            "us-central1",
            Duration::from_millis(10),
        )
        .with_endpoint(&server.url());

        synthesizer
            .synthesize_to_object(
                "bonjour",
                &VOICE,
                "gs://demo-bucket/text_audios/input-1.mp3",
                Duration::from_secs(5),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mock_synthesizer_writes_to_sink() {
        let store = Arc::new(MemoryStore::new());
        let mock = MockSynthesizer::new().with_sink(store.clone());

        mock.synthesize_to_object(
            "text",
            &VOICE,
            "gs://bucket/output_audios/input-1.mp3",
            Duration::from_secs(1),
        )
        .await
        .unwrap();

        assert_eq!(mock.calls(), 1);
        assert!(store.get("output_audios/input-1.mp3").is_some());
        assert_eq!(mock.uris(), vec!["gs://bucket/output_audios/input-1.mp3"]);
    }

    #[tokio::test]
    async fn test_mock_synthesizer_failure() {
        let mock = MockSynthesizer::new().with_failure();
        let err = mock
            .synthesize_to_object("text", &VOICE, "gs://b/o.mp3", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("mock synthesis failure"));
    }
}
