//! Narrative report generation with a deterministic fallback.

mod chat;
mod prompt;
mod provider;

pub use chat::ChatCompletionsClient;
pub use prompt::{build_prompt, describe_axis};
pub use provider::{GenerationError, GenerationParams, GenerationRequest, TextGenerator};

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::scoring::{AxisScores, TypeCode};
use crate::config::GenerationConfig;

/// Report used whenever generation is unavailable.
pub fn fallback_report(type_code: &TypeCode) -> String {
    format!("{type_code} personality traits are...")
}

/// Trim provider output and unwrap a fenced code block (e.g. ```` ```html ````).
pub fn sanitize_content(raw: &str) -> String {
    let mut content = raw.trim();

    if let Some(rest) = content.strip_prefix("```") {
        // An info string only runs to the end of the opening fence line.
        content = match rest.split_once('\n') {
            Some((info, body)) if is_info_string(info) => body,
            _ => rest,
        };
    }
    if let Some(rest) = content.strip_suffix("```") {
        content = rest;
    }

    content.trim().to_string()
}

fn is_info_string(candidate: &str) -> bool {
    candidate
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Builds the prompt, calls the provider once under a timeout, and falls back
/// to a fixed template on any failure.
pub struct ReportGenerator {
    generator: Arc<dyn TextGenerator>,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
    params: GenerationParams,
}

impl ReportGenerator {
    pub fn new(config: &GenerationConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: config.timeout,
            params: GenerationParams::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Always yields a report; generation failures degrade to [`fallback_report`].
    pub async fn generate(&self, type_code: &TypeCode, scores: &AxisScores) -> String {
        match self.try_generate(type_code, scores).await {
            Ok(report) => {
                info!(
                    provider = self.generator.provider_name(),
                    %type_code,
                    chars = report.len(),
                    "generated narrative report"
                );
                report
            }
            Err(err) => {
                warn!(
                    provider = self.generator.provider_name(),
                    %type_code,
                    error = %err,
                    "report generation unavailable, using fallback"
                );
                fallback_report(type_code)
            }
        }
    }

    async fn try_generate(
        &self,
        type_code: &TypeCode,
        scores: &AxisScores,
    ) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let prompt = build_prompt(type_code, scores);
        let request = GenerationRequest {
            api_key,
            model: &self.model,
            prompt: &prompt,
            params: &self.params,
        };

        let content = tokio::time::timeout(self.timeout, self.generator.generate(request))
            .await
            .map_err(|_| GenerationError::TimedOut(self.timeout))??;

        let report = sanitize_content(&content);
        if report.is_empty() {
            return Err(GenerationError::EmptyContent);
        }
        Ok(report)
    }
}
