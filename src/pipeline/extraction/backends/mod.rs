//! Inference backends: every vision-capable service the fallback chain can call.

pub mod generative;
pub mod ollama;
pub mod mock;

pub use generative::GenerativeLanguageBackend;
pub use ollama::OllamaVisionBackend;
pub use mock::MockBackend;

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Inference service unreachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Inference service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Inference service returned no text")]
    EmptyResponse,

    #[error("Request blocked by inference service: {0}")]
    Blocked(String),
}

/// One vision-capable inference endpoint.
///
/// `generate` receives the prompt, the base64-encoded document and its mime
/// type, and returns the model's raw text (possibly wrapped in code fences).
/// Implementations call with temperature 0.0 and never retry.
pub trait InferenceBackend: Send + Sync {
    /// Stable identifier, recorded as the extraction source.
    fn id(&self) -> &str;

    fn generate(&self, prompt: &str, image_b64: &str, mime_type: &str)
        -> Result<String, BackendError>;
}

/// Blocking HTTP client with a bounded per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, BackendError> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| BackendError::HttpClient(e.to_string()))
}

/// Map a transport failure; the URL is dropped so query-string keys never reach logs.
pub(crate) fn map_transport_error(e: reqwest::Error, base_url: &str, timeout: Duration) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout(timeout.as_secs())
    } else if e.is_connect() {
        BackendError::Connection(base_url.to_string())
    } else {
        BackendError::HttpClient(e.without_url().to_string())
    }
}

/// Turn a non-success response into `BackendError::Status`, keeping a bounded body excerpt.
pub(crate) fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body: String = response.text().unwrap_or_default().chars().take(512).collect();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}
