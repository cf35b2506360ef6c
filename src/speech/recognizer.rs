//! Speech-to-text behind a trait.
//!
//! This trait allows swapping implementations (the Cloud Speech API vs mock).

use crate::error::{PolyvoxError, Result};
use crate::gcp;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const OPERATION: &str = "speech recognition";
const DEFAULT_ENDPOINT: &str = "https://speech.googleapis.com";

/// Trait for speech recognition.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize mono FLAC audio.
    ///
    /// Returns the best transcript, or `None` when the service reports no
    /// results (a silent or unintelligible clip). The service runs this as a
    /// long-running operation; `timeout` bounds how long the caller waits.
    async fn recognize(
        &self,
        audio: &[u8],
        language: &str,
        timeout: Duration,
    ) -> Result<Option<String>>;
}

/// Recognition over the Cloud Speech REST API.
pub struct GoogleRecognizer {
    http: reqwest::Client,
    token: String,
    endpoint: String,
    poll_interval: Duration,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechResult>,
}

#[derive(Debug, Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternatives: Vec<SpeechAlternative>,
}

#[derive(Debug, Deserialize)]
struct SpeechAlternative {
    transcript: String,
}

impl GoogleRecognizer {
    pub fn new(http: reqwest::Client, token: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            http,
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
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
impl SpeechRecognizer for GoogleRecognizer {
    async fn recognize(
        &self,
        audio: &[u8],
        language: &str,
        timeout: Duration,
    ) -> Result<Option<String>> {
        let request = RecognizeRequest {
            config: RecognitionConfig {
                language_code: language,
            },
            audio: RecognitionAudio {
                content: BASE64.encode(audio),
            },
        };

        let response = self
            .http
            .post(format!(
                "{}/v1/speech:longrunningrecognize",
                self.endpoint
            ))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        let response = gcp::expect_success(response, OPERATION).await?;
        let operation: gcp::Operation = response.json().await?;

        let operation_url = format!("{}/v1/{}", self.endpoint, operation.name);
        let payload = gcp::await_operation(
            &self.http,
            &self.token,
            &operation_url,
            OPERATION,
            timeout,
            self.poll_interval,
        )
        .await?;

        if payload.is_null() {
            return Ok(None);
        }
        let parsed: RecognizeResponse =
            serde_json::from_value(payload).map_err(|e| PolyvoxError::Api {
                operation: OPERATION.to_string(),
                message: format!("malformed response: {e}"),
            })?;

        Ok(parsed
            .results
            .into_iter()
            .next()
            .and_then(|result| result.alternatives.into_iter().next())
            .map(|alternative| alternative.transcript))
    }
}

/// Mock recognizer for testing
#[derive(Debug)]
pub struct MockRecognizer {
    response: Option<String>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockRecognizer {
    /// Create a mock that returns a fixed transcript
    pub fn new() -> Self {
        Self {
            response: Some("mock transcript".to_string()),
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Configure the mock to return a specific transcript
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = Some(response.to_string());
        self
    }

    /// Configure the mock to report no recognition results
    pub fn with_empty_result(mut self) -> Self {
        self.response = None;
        self
    }

    /// Configure the mock to fail
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of recognize invocations so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn recognize(
        &self,
        _audio: &[u8],
        _language: &str,
        _timeout: Duration,
    ) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(PolyvoxError::Api {
                operation: OPERATION.to_string(),
                message: "mock recognition failure".to_string(),
            });
        }
        Ok(self.response.clone())
    }
}
