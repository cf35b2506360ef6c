//! Google Cloud Storage client over the JSON API.

use crate::error::{PolyvoxError, Result};
use crate::gcp;
use crate::storage::ObjectStore;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use url::Url;

const API_BASE: &str = "https://storage.googleapis.com/storage/v1";
const UPLOAD_BASE: &str = "https://storage.googleapis.com/upload/storage/v1";

/// Object storage backed by a Google Cloud Storage bucket.
pub struct GcsStore {
    http: reqwest::Client,
    token: String,
    bucket: String,
    api_base: String,
    upload_base: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    items: Vec<ObjectEntry>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    name: String,
}

impl GcsStore {
    pub fn new(
        http: reqwest::Client,
        token: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token: token.into(),
            bucket: bucket.into(),
            api_base: API_BASE.to_string(),
            upload_base: UPLOAD_BASE.to_string(),
        }
    }

    #[cfg(test)]
    fn with_endpoints(mut self, api_base: &str, upload_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self.upload_base = upload_base.to_string();
        self
    }

    fn endpoint(&self, base: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(base).map_err(|e| PolyvoxError::Storage {
            message: format!("invalid storage endpoint: {e}"),
        })?;
        url.path_segments_mut()
            .map_err(|()| PolyvoxError::Storage {
                message: "invalid storage endpoint".to_string(),
            })?
            .extend(segments);
        Ok(url)
    }

    /// Metadata/media URL for one object. The object name is a single path
    /// segment, so embedded `/` get percent-encoded.
    fn object_url(&self, object: &str) -> Result<Url> {
        self.endpoint(&self.api_base, &["b", self.bucket.as_str(), "o", object])
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.endpoint(&self.api_base, &["b", self.bucket.as_str(), "o"])?;
            url.query_pairs_mut().append_pair("prefix", prefix);
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let response = self.http.get(url).bearer_auth(&self.token).send().await?;
            let response = gcp::expect_success(response, "storage list").await?;
            let page: ListResponse = response.json().await?;

            names.extend(page.items.into_iter().map(|o| o.name));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(names)
    }

    async fn download(&self, object: &str, dest: &Path) -> Result<()> {
        let mut url = self.object_url(object)?;
        url.query_pairs_mut().append_pair("alt", "media");

        let response = self.http.get(url).bearer_auth(&self.token).send().await?;
        let response = gcp::expect_success(response, "storage download").await?;
        let bytes = response.bytes().await?;

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(dest, &bytes)?;
        Ok(())
    }

    async fn upload(&self, src: &Path, object: &str) -> Result<()> {
        let mut url = self.endpoint(&self.upload_base, &["b", self.bucket.as_str(), "o"])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", object);

        let bytes = std::fs::read(src)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .body(bytes)
            .send()
            .await?;
        gcp::expect_success(response, "storage upload").await?;
        Ok(())
    }

    async fn exists(&self, object: &str) -> Result<bool> {
        let url = self.object_url(object)?;
        let response = self.http.get(url).bearer_auth(&self.token).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        gcp::expect_success(response, "storage stat").await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_for(server: &mockito::Server) -> GcsStore {
        GcsStore::new(reqwest::Client::new(), "token", "test-bucket")
            .with_endpoints(&server.url(), &server.url())
    }

    #[tokio::test]
    async fn test_list_returns_object_names() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/b/test-bucket/o")
            .match_query(mockito::Matcher::UrlEncoded(
                "prefix".into(),
                "input_audios/".into(),
            ))
            .with_status(200)
            .with_body(
                r#"{"items": [{"name": "input_audios/input-1.mp3"}, {"name": "input_audios/input-2.mp3"}]}"#,
            )
            .create_async()
            .await;

        let store = store_for(&server);
        let names = store.list("input_audios/").await.unwrap();
        assert_eq!(
            names,
            vec!["input_audios/input-1.mp3", "input_audios/input-2.mp3"]
        );
    }

    #[tokio::test]
    async fn test_list_empty_bucket() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/b/test-bucket/o")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let store = store_for(&server);
        assert!(store.list("input_audios/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_writes_file_and_parents() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/b/test-bucket/o/input_audios%2Finput-1.mp3")
            .match_query(mockito::Matcher::UrlEncoded("alt".into(), "media".into()))
            .with_status(200)
            .with_body("audio-bytes")
            .create_async()
            .await;

        let store = store_for(&server);
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("input_audios/input-1.mp3");
        store
            .download("input_audios/input-1.mp3", &dest)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"audio-bytes");
    }

    #[tokio::test]
    async fn test_exists_distinguishes_404() {
        let mut server = mockito::Server::new_async().await;
        let _present = server
            .mock("GET", "/b/test-bucket/o/text_audios%2Finput-1.mp3")
            .with_status(200)
            .with_body(r#"{"name": "text_audios/input-1.mp3"}"#)
            .create_async()
            .await;
        let _absent = server
            .mock("GET", "/b/test-bucket/o/text_audios%2Finput-2.mp3")
            .with_status(404)
            .create_async()
            .await;

        let store = store_for(&server);
        assert!(store.exists("text_audios/input-1.mp3").await.unwrap());
        assert!(!store.exists("text_audios/input-2.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_propagates_auth_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/b/test-bucket/o/text_audios%2Finput-1.mp3")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let store = store_for(&server);
        let err = store.exists("text_audios/input-1.mp3").await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_upload_posts_file_bytes() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/b/test-bucket/o")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("uploadType".into(), "media".into()),
                mockito::Matcher::UrlEncoded("name".into(), "text_prompts/input-1.txt".into()),
            ]))
            .match_body("transcript text")
            .with_status(200)
            .with_body(r#"{"name": "text_prompts/input-1.txt"}"#)
            .create_async()
            .await;

        let store = store_for(&server);
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("input-1.txt");
        std::fs::write(&src, "transcript text").unwrap();
        store.upload(&src, "text_prompts/input-1.txt").await.unwrap();
    }
}
