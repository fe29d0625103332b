use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Broad file categories we accept
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FileCategory {
    Pdf,
    Image,
    PlainText,
    Unsupported,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::PlainText => "plain_text",
            Self::Unsupported => "unsupported",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    fn from_mime(mime: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        if mime == "application/pdf" {
            Self::Pdf
        } else if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("text/") {
            Self::PlainText
        } else {
            Self::Unsupported
        }
    }
}

/// Result of format detection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatDetection {
    pub mime_type: String,
    pub category: FileCategory,
}

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect format from magic bytes (NOT file extensions).
pub fn detect_format(bytes: &[u8]) -> FormatDetection {
    let header = &bytes[..bytes.len().min(16)];

    let (mime_type, category) = match header {
        [0x25, 0x50, 0x44, 0x46, ..] => ("application/pdf", FileCategory::Pdf),
        [0xFF, 0xD8, 0xFF, ..] => ("image/jpeg", FileCategory::Image),
        [0x89, 0x50, 0x4E, 0x47, ..] => ("image/png", FileCategory::Image),
        [0x47, 0x49, 0x46, 0x38, ..] => ("image/gif", FileCategory::Image),
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => {
            ("image/tiff", FileCategory::Image)
        }
        _ if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WEBP" => {
            ("image/webp", FileCategory::Image)
        }
        // HEIC/HEIF: "ftyp" at offset 4
        _ if header.len() >= 12 && &header[4..8] == b"ftyp" => ("image/heic", FileCategory::Image),
        _ if is_likely_text(bytes) => ("text/plain", FileCategory::PlainText),
        _ => (OCTET_STREAM, FileCategory::Unsupported),
    };

    FormatDetection {
        mime_type: mime_type.to_string(),
        category,
    }
}

/// Valid UTF-8 in the first 4 KiB with at least 80% printable characters.
pub fn is_likely_text(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(4096)];
    if head.is_empty() {
        return false;
    }

    // A multi-byte sequence may be cut at the window edge.
    let text = match std::str::from_utf8(head) {
        Ok(t) => t,
        Err(e) if e.error_len().is_none() && e.valid_up_to() > 0 => {
            match std::str::from_utf8(&head[..e.valid_up_to()]) {
                Ok(t) => t,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };

    let total = text.chars().count().max(1);
    let printable = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .count();
    printable as f64 / total as f64 > 0.80
}

/// An upload that passed validation, with its resolved content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub mime_type: String,
    pub category: FileCategory,
    pub size: usize,
    pub declared_type: String,
}

/// Record type used when the caller did not declare one.
pub const DEFAULT_DECLARED_TYPE: &str = "Other";

/// Check an upload and resolve its mime type.
///
/// A missing or generic declared mime type is replaced by the sniffed one,
/// then by a guess from the file extension.
pub fn validate_upload(
    bytes: &[u8],
    file_name: &str,
    declared_type: &str,
    mime_type: &str,
    max_bytes: usize,
) -> Result<ValidatedUpload, ValidationError> {
    if file_name.trim().is_empty() && bytes.is_empty() {
        return Err(ValidationError::MissingFile);
    }
    if bytes.is_empty() {
        return Err(ValidationError::EmptyFile);
    }
    if bytes.len() > max_bytes {
        return Err(ValidationError::FileTooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }

    let sniffed = detect_format(bytes);
    let declared_mime = mime_type.trim();
    let resolved_mime = if !declared_mime.is_empty() && declared_mime != OCTET_STREAM {
        declared_mime.to_string()
    } else if sniffed.category.is_supported() {
        sniffed.mime_type.clone()
    } else {
        mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or(OCTET_STREAM)
            .to_string()
    };

    let category = if sniffed.category.is_supported() {
        sniffed.category
    } else {
        FileCategory::from_mime(&resolved_mime)
    };
    if !category.is_supported() {
        return Err(ValidationError::UnsupportedFormat(resolved_mime));
    }

    let declared_type = match declared_type.trim() {
        "" => DEFAULT_DECLARED_TYPE.to_string(),
        t => t.to_string(),
    };

    Ok(ValidatedUpload {
        mime_type: resolved_mime,
        category,
        size: bytes.len(),
        declared_type,
    })
}

/// Strip path components from a client-supplied file name.
pub fn base_file_name(original: &str) -> String {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() {
        "document".to_string()
    } else {
        name.chars().filter(|c| *c != '\0').take(255).collect()
    }
}
