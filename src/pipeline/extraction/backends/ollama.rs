//! Local vision backend speaking the Ollama `/api/chat` protocol.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{check_status, http_client, map_transport_error, BackendError, InferenceBackend};

pub struct OllamaVisionBackend {
    id: String,
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::blocking::Client,
}

impl OllamaVisionBackend {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            id: format!("ollama:{model}"),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
            client: http_client(timeout)?,
        })
    }
}

#[derive(Debug, Serialize)]
struct VisionChatRequest<'a> {
    model: &'a str,
    messages: Vec<VisionChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct VisionChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    images: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct VisionChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

impl InferenceBackend for OllamaVisionBackend {
    fn id(&self) -> &str {
        &self.id
    }

    // Ollama sniffs the image itself, so the mime type is not forwarded.
    fn generate(
        &self,
        prompt: &str,
        image_b64: &str,
        _mime_type: &str,
    ) -> Result<String, BackendError> {
        let body = VisionChatRequest {
            model: &self.model,
            messages: vec![VisionChatMessage {
                role: "user",
                content: prompt,
                images: vec![image_b64],
            }],
            stream: false,
            options: ChatOptions { temperature: 0.0 },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .map_err(|e| map_transport_error(e, &self.base_url, self.timeout))?;

        let parsed: VisionChatResponse = check_status(response)?
            .json()
            .map_err(|e| BackendError::ResponseParsing(e.to_string()))?;

        if parsed.message.content.trim().is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(parsed.message.content)
    }
}
