pub mod types;
pub mod sanitize;
pub mod parser;
pub mod prompt;
pub mod backends;
pub mod orchestrator;
pub mod heuristic;

pub use types::*;
pub use sanitize::*;
pub use parser::*;
pub use prompt::*;
pub use backends::{BackendError, InferenceBackend};
pub use orchestrator::*;
pub use heuristic::*;

use thiserror::Error;

/// One backend's failure inside a fallback run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub backend: String,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Extraction response is not a valid record: {0}")]
    Parse(String),

    #[error("Inference backend {backend} failed: {source}")]
    Backend {
        backend: String,
        #[source]
        source: BackendError,
    },

    #[error("All {} inference backends failed", failures.len())]
    AllBackendsFailed { failures: Vec<BackendFailure> },
}
