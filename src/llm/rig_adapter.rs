//! Bridges rig's `CompletionModel` to our completion types.

use rig::completion::{AssistantContent, CompletionError, CompletionModel, Message};

use super::provider::{CompletionRequest, CompletionResponse};
use crate::error::LlmError;

/// Send one request through a rig completion model.
///
/// System messages become the preamble, user messages the prompt. Only the
/// text parts of the reply are kept, concatenated in order.
pub(crate) async fn complete_with<M: CompletionModel>(
    model: &M,
    provider: &str,
    request: &CompletionRequest,
) -> Result<CompletionResponse, LlmError> {
    let mut builder = model.completion_request(Message::user(request.user_text()));

    let instructions = request.system_text();
    if !instructions.is_empty() {
        builder = builder.preamble(instructions);
    }
    if let Some(temperature) = request.temperature {
        builder = builder.temperature(f64::from(temperature));
    }

    let response = builder
        .send()
        .await
        .map_err(|e| map_completion_error(provider, e))?;

    let content: String = response
        .choice
        .iter()
        .filter_map(|part| match part {
            AssistantContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect();

    Ok(CompletionResponse {
        content,
        input_tokens: saturating_u32(response.usage.input_tokens),
        output_tokens: saturating_u32(response.usage.output_tokens),
    })
}

fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Map a rig error onto `LlmError`. Rig reports HTTP failures as text, so an
/// auth rejection is recognised from the message.
pub(crate) fn map_completion_error(provider: &str, err: CompletionError) -> LlmError {
    match err {
        CompletionError::JsonError(e) => LlmError::InvalidResponse {
            provider: provider.to_string(),
            reason: e.to_string(),
        },
        CompletionError::ResponseError(reason) => LlmError::InvalidResponse {
            provider: provider.to_string(),
            reason,
        },
        other => {
            let reason = other.to_string();
            if is_auth_failure(&reason) {
                LlmError::AuthFailed {
                    provider: provider.to_string(),
                }
            } else {
                LlmError::RequestFailed {
                    provider: provider.to_string(),
                    reason,
                }
            }
        }
    }
}

fn is_auth_failure(reason: &str) -> bool {
    let lowered = reason.to_lowercase();
    lowered.contains("401")
        || lowered.contains("unauthorized")
        || lowered.contains("invalid_api_key")
        || lowered.contains("incorrect api key")
}
