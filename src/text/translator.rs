//! Text translation behind a trait.

use crate::error::{PolyvoxError, Result};
use crate::gcp;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

const OPERATION: &str = "translation";
const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com";

/// Trait for text translation.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate text between the given language codes.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Translation over the Cloud Translation v2 REST API.
pub struct GoogleTranslator {
    http: reqwest::Client,
    token: String,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: Vec<&'a str>,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl GoogleTranslator {
    pub fn new(http: reqwest::Client, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let request = TranslateRequest {
            q: vec![text],
            source,
            target,
            format: "text",
        };

        let response = self
            .http
            .post(format!("{}/language/translate/v2", self.endpoint))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        let response = gcp::expect_success(response, OPERATION).await?;
        let parsed: TranslateResponse = response.json().await?;

        // One input string in, one translation element out. A response with
        // no element at all is malformed, not an empty translation.
        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|translation| translation.translated_text)
            .ok_or_else(|| PolyvoxError::Api {
                operation: OPERATION.to_string(),
                message: "malformed response: no translations returned".to_string(),
            })
    }
}

/// Mock translator for testing
#[derive(Debug)]
pub struct MockTranslator {
    response: String,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self {
            response: "texte traduit".to_string(),
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Configure the mock to return a specific translation
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of translate invocations so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(PolyvoxError::Api {
                operation: OPERATION.to_string(),
                message: "mock translation failure".to_string(),
            });
        }
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_translate_returns_first_translation() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/language/translate/v2")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "q": ["hello"],
                "source": "en",
                "target": "fr",
                "format": "text"
            })))
            .with_status(200)
            .with_body(r#"{"data": {"translations": [{"translatedText": "bonjour"}]}}"#)
            .create_async()
            .await;

        let translator =
            GoogleTranslator::new(reqwest::Client::new(), "token").with_endpoint(&server.url());
        let text = translator.translate("hello", "en", "fr").await.unwrap();
        assert_eq!(text, "bonjour");
    }

    #[tokio::test]
    async fn test_translate_missing_translation_element_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/language/translate/v2")
            .with_status(200)
            .with_body(r#"{"data": {"translations": []}}"#)
            .create_async()
            .await;

        let translator =
            GoogleTranslator::new(reqwest::Client::new(), "token").with_endpoint(&server.url());
        let err = translator.translate("hello", "en", "fr").await.unwrap_err();
        assert!(err.to_string().contains("malformed response"));
    }

    #[tokio::test]
    async fn test_translate_empty_text_passes_through_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/language/translate/v2")
            .with_status(200)
            .with_body(r#"{"data": {"translations": [{"translatedText": ""}]}}"#)
            .create_async()
            .await;

        let translator =
            GoogleTranslator::new(reqwest::Client::new(), "token").with_endpoint(&server.url());
        let text = translator.translate("hello", "en", "fr").await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_mock_translator_counts_calls() {
        let mock = MockTranslator::new().with_response("salut");
        assert_eq!(mock.translate("hi", "en", "fr").await.unwrap(), "salut");
        assert_eq!(mock.calls(), 1);
    }
}
