//! Long-form text generation behind a trait.

use crate::defaults;
use crate::error::{PolyvoxError, Result};
use crate::gcp;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

const OPERATION: &str = "text generation";

/// Trait for generative text completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce one completion for the prompt, sampled deterministically.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generation over the Vertex `generateContent` REST API.
pub struct GeminiGenerator {
    http: reqwest::Client,
    token: String,
    project: String,
    location: String,
    model: String,
    endpoint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiGenerator {
    pub fn new(
        http: reqwest::Client,
        token: impl Into<String>,
        project: impl Into<String>,
        location: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let location = location.into();
        let endpoint = format!("https://{location}-aiplatform.googleapis.com");
        Self {
            http,
            token: token.into(),
            project: project.into(),
            location,
            model: model.into(),
            endpoint,
        }
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: defaults::GENERATION_TEMPERATURE,
            },
        };

        let response = self
            .http
            .post(format!(
                "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
                self.endpoint, self.project, self.location, self.model
            ))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        let response = gcp::expect_success(response, OPERATION).await?;
        let parsed: GenerateResponse = response.json().await?;

        // The completion is passed through unmodified, even when empty.
        Ok(parsed
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Mock generator for testing
#[derive(Debug)]
pub struct MockGenerator {
    response: String,
    should_fail: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            response: "mock paragraph".to_string(),
            should_fail: false,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Configure the mock to return a specific completion
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of generate invocations so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(prompt.to_string());
        if self.should_fail {
            return Err(PolyvoxError::Api {
                operation: OPERATION.to_string(),
                message: "mock generation failure".to_string(),
            });
        }
        Ok(self.response.clone())
    }
}
