pub mod format;
pub mod hash;

pub use format::*;
pub use hash::*;

use thiserror::Error;

/// Caller input rejected before anything is stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File missing")]
    MissingFile,

    #[error("File is empty")]
    EmptyFile,

    #[error("File too large: {size} bytes exceeds {max} byte limit")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Missing caller identity")]
    MissingOwner,

    #[error("Invalid caller identity: {0}")]
    InvalidOwner(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Trim an owner id and check it can serve as one storage key segment.
pub fn validate_owner(owner_id: &str) -> Result<&str, ValidationError> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        return Err(ValidationError::MissingOwner);
    }
    if owner_id == "." || owner_id == ".." || owner_id.contains(['/', '\\', '\0']) {
        return Err(ValidationError::InvalidOwner(owner_id.to_string()));
    }
    Ok(owner_id)
}
