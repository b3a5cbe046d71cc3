//! Summary generator: turns a Q/A bundle into summary text via the LLM.

use std::sync::Arc;

use tracing::{info, warn};

use super::prompts::{SUMMARY_INSTRUCTIONS, summary_input};
use crate::error::{ConfigError, Result};
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Environment variable that must hold the API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const TEMPERATURE: f32 = 0.0;

/// Delegates summary requests to an optional provider.
///
/// Without a provider (no credential configured) every request fails with a
/// configuration error; the rest of the wizard keeps working.
pub struct SummaryGenerator {
    llm: Option<Arc<dyn LlmProvider>>,
}

impl SummaryGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm: Some(llm) }
    }

    /// A generator with no credential configured.
    pub fn unconfigured() -> Self {
        Self { llm: None }
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    pub fn default_model(&self) -> Option<&str> {
        self.llm.as_ref().map(|llm| llm.model_name())
    }

    /// One request, one response, trimmed. No retries.
    pub async fn generate(
        &self,
        category_hint: &str,
        qa_bundle: &str,
        model_override: Option<&str>,
    ) -> Result<String> {
        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar(API_KEY_ENV.to_string()))?;

        let mut request = CompletionRequest::new(vec![
            ChatMessage::system(SUMMARY_INSTRUCTIONS),
            ChatMessage::user(summary_input(category_hint, qa_bundle)),
        ])
        .with_temperature(TEMPERATURE);
        if let Some(model) = model_override {
            request = request.with_model(model);
        }

        let model = model_override.unwrap_or(llm.model_name());
        info!(model = model, category_hint = category_hint, "Generating summary");

        let response = llm.complete(request).await.map_err(|e| {
            warn!(model = model, error = %e, "Summary generation failed");
            e
        })?;

        Ok(response.content.trim().to_string())
    }
}
