//! Shared plumbing for the Google Cloud REST clients.
//!
//! Recognition and synthesis are long-running operations on the service
//! side: the initial POST returns an operation name, which is then polled
//! until `done` or until the caller's deadline expires. The deadline is an
//! explicit parameter and expiry is a typed error; there is no retry layer.

use crate::error::{PolyvoxError, Result};
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Initial response to a long-running request.
#[derive(Debug, Deserialize)]
pub(crate) struct Operation {
    pub name: String,
}

/// Polled state of a long-running operation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OperationStatus {
    #[serde(default)]
    pub done: bool,
    pub error: Option<OperationError>,
    pub response: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OperationError {
    pub message: Option<String>,
}

/// Turn a non-success HTTP response into a typed capability error.
pub(crate) async fn expect_success(
    response: reqwest::Response,
    operation: &str,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PolyvoxError::Api {
        operation: operation.to_string(),
        message: format!("status {status}: {}", body.trim()),
    })
}

/// Poll an operation URL until it completes, fails, or the deadline passes.
///
/// Returns the operation's `response` payload (or null when the service
/// reports done without one).
pub(crate) async fn await_operation(
    http: &reqwest::Client,
    token: &str,
    operation_url: &str,
    operation: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<serde_json::Value> {
    let deadline = Instant::now() + timeout;
    loop {
        let response = http.get(operation_url).bearer_auth(token).send().await?;
        let response = expect_success(response, operation).await?;
        let status: OperationStatus = response.json().await?;

        if status.done {
            if let Some(err) = status.error {
                return Err(PolyvoxError::Api {
                    operation: operation.to_string(),
                    message: err.message.unwrap_or_else(|| "operation failed".to_string()),
                });
            }
            return Ok(status.response.unwrap_or(serde_json::Value::Null));
        }

        if Instant::now() >= deadline {
            return Err(PolyvoxError::OperationTimeout {
                operation: operation.to_string(),
                secs: timeout.as_secs(),
            });
        }
        tokio::time::sleep(poll_interval).await;
    }
}
