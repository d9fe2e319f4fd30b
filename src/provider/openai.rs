//! OpenAI-compatible chat completions client with `json_schema` response format.

use super::{
    build_provider_http_client, map_http_error, map_status_error, CompletionRequest,
    CompletionResponse, ModelProviderClient, TokenUsage,
};
use crate::error::ApiError;
use crate::prompt::BinaryPart;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider client
pub struct OpenAIClient {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(model: String, api_key: String, base_url: Option<String>) -> Result<Self, ApiError> {
        let client = build_provider_http_client()?;
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client,
            model,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl ModelProviderClient for OpenAIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, ApiError> {
        let body = build_request_body(&self.model, request);
        debug!(
            model = %self.model,
            multipart = request.payload.is_multipart(),
            "Sending chat completion request"
        );

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(map_http_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_status_error(status, &error_text));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e)))?;

        into_completion(completion)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

fn binary_content_part(binary: &BinaryPart) -> Value {
    let data_url = format!("data:{};base64,{}", binary.media_type, binary.data);
    if binary.media_type.starts_with("image/") {
        json!({ "type": "image_url", "image_url": { "url": data_url } })
    } else {
        json!({
            "type": "file",
            "file": { "filename": "attachment.pdf", "file_data": data_url }
        })
    }
}

/// Strict structured outputs require closed objects.
fn close_objects(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out: serde_json::Map<String, Value> = map
                .iter()
                .map(|(key, value)| (key.clone(), close_objects(value)))
                .collect();
            if map.get("type").and_then(Value::as_str) == Some("object") {
                out.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(close_objects).collect()),
        other => other.clone(),
    }
}

fn build_request_body(model: &str, request: &CompletionRequest) -> Value {
    let payload = &request.payload;
    let content = match &payload.binary_part {
        Some(binary) => json!([
            { "type": "text", "text": payload.instructions },
            binary_content_part(binary),
        ]),
        None => json!(payload.instructions),
    };

    json!({
        "model": model,
        "messages": [{ "role": "user", "content": content }],
        "temperature": request.options.temperature,
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": "generation_result",
                "strict": true,
                "schema": close_objects(request.schema.as_value()),
            }
        },
        "stream": false,
    })
}

fn into_completion(completion: ChatCompletionResponse) -> Result<CompletionResponse, ApiError> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::ProviderError("No choices in response".to_string()))?;

    let content = choice
        .message
        .content
        .ok_or_else(|| ApiError::ProviderError("Choice contained no content".to_string()))?;

    Ok(CompletionResponse {
        content,
        model: completion.model,
        usage: completion.usage.map(|usage| TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }),
        finish_reason: choice.finish_reason,
    })
}
