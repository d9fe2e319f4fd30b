//! Generation Client
//!
//! One schema-constrained round trip to the configured provider, followed by
//! field-by-field validation of the untrusted response. Provider failures are
//! logged and collapsed into `GenerationFailed`; shape violations become
//! `MalformedResponse`. There are no retries.

use crate::error::ApiError;
use crate::prompt::{PromptPayload, ResponseSchema};
use crate::provider::{CompletionOptions, CompletionRequest, ModelProviderClient};
use crate::types::GenerationResult;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub struct GenerationClient {
    provider: Arc<dyn ModelProviderClient>,
    options: CompletionOptions,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn ModelProviderClient>) -> Self {
        Self {
            provider,
            options: CompletionOptions::default(),
        }
    }

    pub fn provider(&self) -> &dyn ModelProviderClient {
        self.provider.as_ref()
    }

    /// Send the payload and return a fully typed result, or fail.
    pub async fn generate(
        &self,
        payload: PromptPayload,
        schema: &ResponseSchema,
    ) -> Result<GenerationResult, ApiError> {
        let request = CompletionRequest {
            payload,
            schema: schema.clone(),
            options: self.options.clone(),
        };

        let started = Instant::now();
        let response = match self.provider.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    provider = self.provider.provider_name(),
                    model = self.provider.model_name(),
                    error = %e,
                    "Generation request failed"
                );
                return Err(ApiError::GenerationFailed(format!(
                    "{} request failed",
                    self.provider.provider_name()
                )));
            }
        };

        info!(
            provider = self.provider.provider_name(),
            model = %response.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            finish_reason = response.finish_reason.as_deref(),
            "Generation response received"
        );

        parse_generation_result(&response.content).map_err(|e| {
            warn!(error = %e, "Provider response rejected");
            debug!(raw_response = %response.content, "Rejected response body");
            e
        })
    }
}

/// Parse and validate raw provider text as a `GenerationResult`.
///
/// Every field must be present and correctly typed; there is no partial result.
pub fn parse_generation_result(raw: &str) -> Result<GenerationResult, ApiError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| ApiError::MalformedResponse(format!("response is not valid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| ApiError::MalformedResponse("response is not a JSON object".to_string()))?;

    let title = string_field(object, "title")?;
    let post = string_field(object, "post")?;

    let hashtags = object
        .get("hashtags")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ApiError::MalformedResponse("field `hashtags` must be an array".to_string())
        })?;
    if hashtags.is_empty() {
        return Err(ApiError::MalformedResponse(
            "field `hashtags` must not be empty".to_string(),
        ));
    }
    let hashtags = hashtags
        .iter()
        .enumerate()
        .map(|(index, tag)| {
            tag.as_str().map(str::to_string).ok_or_else(|| {
                ApiError::MalformedResponse(format!("hashtags[{}] is not a string", index))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GenerationResult {
        title,
        post,
        hashtags,
    })
}

fn string_field(object: &serde_json::Map<String, Value>, name: &str) -> Result<String, ApiError> {
    object
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::MalformedResponse(format!("field `{}` must be a string", name)))
}
