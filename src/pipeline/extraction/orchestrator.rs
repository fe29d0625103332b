//! Ordered fallback over inference backends: first parsable answer wins.

use std::sync::Arc;

use base64::Engine as _;

use super::backends::{GenerativeLanguageBackend, InferenceBackend, OllamaVisionBackend};
use super::parser::parse;
use super::sanitize::sanitize;
use super::types::ExtractedRecord;
use super::{BackendFailure, ExtractionError};
use crate::config::AppConfig;

pub struct FallbackOrchestrator {
    backends: Vec<Arc<dyn InferenceBackend>>,
}

impl FallbackOrchestrator {
    /// Backends are tried in the given order.
    pub fn new(backends: Vec<Arc<dyn InferenceBackend>>) -> Self {
        Self { backends }
    }

    /// Hosted models in priority order (only when an API key is configured),
    /// then the local Ollama model when one is configured.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut backends: Vec<Arc<dyn InferenceBackend>> = Vec::new();

        if let Some(key) = &config.google_api_key {
            for model in &config.inference_models {
                match GenerativeLanguageBackend::new(
                    &config.generative_base_url,
                    model,
                    key,
                    config.inference_timeout,
                ) {
                    Ok(backend) => backends.push(Arc::new(backend)),
                    Err(e) => tracing::warn!(model = %model, error = %e, "Skipping hosted backend"),
                }
            }
        } else {
            tracing::info!("No GOOGLE_API_KEY configured, hosted inference disabled");
        }

        if let (Some(url), Some(model)) = (&config.ollama_url, &config.ollama_model) {
            match OllamaVisionBackend::new(url, model, config.inference_timeout) {
                Ok(backend) => backends.push(Arc::new(backend)),
                Err(e) => tracing::warn!(model = %model, error = %e, "Skipping Ollama backend"),
            }
        }

        Self::new(backends)
    }

    pub fn backend_ids(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Try each backend once, in order. Returns the record and the id of the
    /// backend that produced it.
    ///
    /// Transport failures and unparsable answers are logged and skipped;
    /// later backends are never called once one succeeds.
    pub fn extract(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<(ExtractedRecord, String), ExtractionError> {
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        let mut failures = Vec::new();

        for backend in &self.backends {
            let _span = tracing::info_span!(
                "inference_attempt",
                backend = %backend.id(),
                image_size = image_bytes.len(),
            )
            .entered();
            let start = std::time::Instant::now();

            let outcome = backend
                .generate(prompt, &image_b64, mime_type)
                .map_err(|source| ExtractionError::Backend {
                    backend: backend.id().to_string(),
                    source,
                })
                .and_then(|raw| parse(&sanitize(&raw)));

            match outcome {
                Ok(record) => {
                    tracing::info!(
                        backend = %backend.id(),
                        elapsed_ms = %start.elapsed().as_millis(),
                        legality = record.legality.as_str(),
                        "Extraction succeeded"
                    );
                    return Ok((record, backend.id().to_string()));
                }
                Err(e) => {
                    tracing::warn!(
                        backend = %backend.id(),
                        elapsed_ms = %start.elapsed().as_millis(),
                        error = %e,
                        "Backend failed, trying next"
                    );
                    failures.push(BackendFailure {
                        backend: backend.id().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(ExtractionError::AllBackendsFailed { failures })
    }
}
