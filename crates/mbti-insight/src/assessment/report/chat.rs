use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::{GenerationError, GenerationRequest, TextGenerator};
use crate::config::GenerationConfig;

/// OpenAI-compatible chat-completions client (DeepSeek by default).
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    endpoint: String,
}

impl ChatCompletionsClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Client whose transport timeout matches the configured report timeout.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| GenerationError::Request(err.to_string()))?;
        Ok(Self::new(client, config.endpoint.clone()))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub(crate) fn chat_request<'a>(request: &GenerationRequest<'a>) -> ChatRequest<'a> {
    ChatRequest {
        model: request.model,
        messages: [ChatMessage {
            role: "user",
            content: request.prompt,
        }],
        temperature: request.params.temperature,
        max_tokens: request.params.max_tokens,
        stream: false,
        presence_penalty: request.params.presence_penalty,
        frequency_penalty: request.params.frequency_penalty,
    }
}

/// Pull the first choice's message content out of a completion body.
pub(crate) fn completion_content(body: &[u8]) -> Result<String, GenerationError> {
    let response: ChatResponse = serde_json::from_slice(body)
        .map_err(|err| GenerationError::Malformed(err.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::Malformed("response has no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| GenerationError::Malformed("choice has no message content".to_string()))
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    fn provider_name(&self) -> &str {
        "chat-completions"
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError> {
        let body = serde_json::to_vec(&chat_request(&request))
            .map_err(|err| GenerationError::Request(err.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(request.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).chars().take(512).collect(),
            });
        }

        debug!(bytes = bytes.len(), "received completion");
        completion_content(&bytes)
    }
}
