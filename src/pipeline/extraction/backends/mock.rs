use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BackendError, InferenceBackend};

enum MockReply {
    Text(String),
    Fail(String),
}

/// Backend returning a canned reply; counts how often it was called.
pub struct MockBackend {
    id: String,
    reply: MockReply,
    calls: AtomicUsize,
}

impl MockBackend {
    pub fn new(id: &str, response: &str) -> Self {
        Self {
            id: id.to_string(),
            reply: MockReply::Text(response.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A backend that always fails with a transport error.
    pub fn failing(id: &str, reason: &str) -> Self {
        Self {
            id: id.to_string(),
            reply: MockReply::Fail(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InferenceBackend for MockBackend {
    fn id(&self) -> &str {
        &self.id
    }

    fn generate(
        &self,
        _prompt: &str,
        _image_b64: &str,
        _mime_type: &str,
    ) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(reason) => Err(BackendError::HttpClient(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_response() {
        let mock = MockBackend::new("m", "{}");
        assert_eq!(mock.generate("p", "", "image/png").unwrap(), "{}");
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn failing_mock_errors() {
        let mock = MockBackend::failing("m", "quota exceeded");
        let err = mock.generate("p", "", "image/png").unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
