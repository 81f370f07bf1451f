use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

/// Fixed sampling parameters sent with every report request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_tokens: 2500,
            presence_penalty: 0.1,
            frequency_penalty: 0.1,
        }
    }
}

/// Everything a provider needs for one completion.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    pub prompt: &'a str,
    pub params: &'a GenerationParams,
}

/// Capability interface over the external text-generation provider.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError>;
}

/// Reasons a report could not be generated. Always absorbed into the fallback text.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("provider credential is not configured")]
    MissingCredential,
    #[error("failed to build provider request: {0}")]
    Request(String),
    #[error("provider request failed: {0}")]
    Transport(String),
    #[error("provider returned status {status}")]
    Status { status: u16, body: String },
    #[error("provider response malformed: {0}")]
    Malformed(String),
    #[error("provider returned empty content")]
    EmptyContent,
    #[error("provider did not answer within {0:?}")]
    TimedOut(Duration),
}
