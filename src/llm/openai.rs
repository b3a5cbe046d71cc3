//! OpenAI via rig-core's Responses API client.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::providers::openai;
use secrecy::{ExposeSecret, SecretString};

use super::provider::{CompletionRequest, CompletionResponse, LlmProvider};
use super::rig_adapter::complete_with;
use crate::error::LlmError;

const PROVIDER: &str = "openai";

type ResponsesClient = rig::client::Client<openai::client::OpenAIResponsesExt>;

/// Holds the client rather than one model so a request can name its own.
pub struct OpenAiProvider {
    client: ResponsesClient,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &SecretString, model: &str) -> Result<Self, LlmError> {
        let client: ResponsesClient =
            openai::Client::new(api_key.expose_secret()).map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("Failed to create OpenAI client: {}", e),
            })?;

        Ok(Self {
            client,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model_name = request.model.as_deref().unwrap_or(&self.model);
        let model = self.client.completion_model(model_name);

        let response = complete_with(&model, PROVIDER, &request).await?;
        tracing::debug!(
            model = model_name,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "OpenAI response received"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_with_any_key() {
        // The key is only checked by the API on the first request.
        let provider = OpenAiProvider::new(&SecretString::from("sk-test"), "gpt-4.1").unwrap();
        assert_eq!(provider.model_name(), "gpt-4.1");
    }
}
