//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` over the Gemini REST API. Tool schemas
//! are sent as function declarations; `functionCall` parts in the reply
//! become [`ToolCall`]s for the reply loop.

use std::collections::HashMap;

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, TokenUsage},
    tool::{ToolCall, ToolSchema},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,

    /// API root, overridable for proxies and tests
    pub base_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    /// Read `GOOGLE_API_KEY` (required) and `GEMINI_BASE_URL` (optional)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::Config("GOOGLE_API_KEY is not set".into()))?;
        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        Ok(Self { api_key, base_url })
    }
}

/// Gemini LLM provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a provider against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(GeminiConfig::new(api_key))
    }

    /// Create from configuration
    pub fn from_config(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1beta/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Concatenate system messages into the separate instruction field
    fn system_instruction(messages: &[Message]) -> Option<Value> {
        let text: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(json!({ "parts": [{ "text": text.join("\n\n") }] }))
        }
    }

    /// Convert agent messages to Gemini `contents`.
    ///
    /// Consecutive tool results are folded into one content so they answer
    /// the preceding `functionCall` turn together.
    fn convert_messages(messages: &[Message]) -> Vec<Value> {
        let mut contents: Vec<Value> = Vec::new();
        let mut pending_responses: Vec<Value> = Vec::new();

        for m in messages.iter().filter(|m| m.role != Role::System) {
            if m.role == Role::Tool {
                pending_responses.push(json!({
                    "functionResponse": {
                        "name": m.name.as_deref().unwrap_or("unknown"),
                        "response": { "result": m.content }
                    }
                }));
                continue;
            }

            if !pending_responses.is_empty() {
                contents.push(json!({
                    "role": "user",
                    "parts": std::mem::take(&mut pending_responses)
                }));
            }

            match m.role {
                Role::Assistant => {
                    let mut parts = Vec::new();
                    if !m.content.is_empty() {
                        parts.push(json!({ "text": m.content }));
                    }
                    for call in &m.tool_calls {
                        parts.push(json!({
                            "functionCall": {
                                "name": call.name,
                                "args": call.arguments
                            }
                        }));
                    }
                    contents.push(json!({ "role": "model", "parts": parts }));
                }
                _ => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{ "text": m.content }]
                    }));
                }
            }
        }

        if !pending_responses.is_empty() {
            contents.push(json!({ "role": "user", "parts": pending_responses }));
        }

        contents
    }

    fn convert_tools(tools: &[ToolSchema]) -> Option<Value> {
        if tools.is_empty() {
            return None;
        }

        let declarations: Vec<Value> = tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "parameters": t.parameters_json()
                })
            })
            .collect();

        Some(json!([{ "functionDeclarations": declarations }]))
    }

    fn build_request(
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Value {
        let mut request = json!({
            "contents": Self::convert_messages(messages),
            "generationConfig": {
                "temperature": options.temperature,
                "topP": options.top_p,
                "maxOutputTokens": options.max_tokens
            }
        });

        if let Some(system) = Self::system_instruction(messages) {
            request["systemInstruction"] = system;
        }
        if let Some(tools) = Self::convert_tools(tools) {
            request["tools"] = tools;
        }

        request
    }

    /// Convert a Gemini response to an agent completion
    fn convert_completion(response: GenerateResponse, model: &str) -> Result<Completion> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("No candidates in response".into()))?;

        let mut text = Vec::new();
        let mut tool_calls = Vec::new();

        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(t) = part.text {
                text.push(t);
            }
            if let Some(fc) = part.function_call {
                let arguments: HashMap<String, Value> = match fc.args {
                    Value::Object(map) => map.into_iter().collect(),
                    _ => HashMap::new(),
                };
                tool_calls.push(ToolCall {
                    id: Some(format!("tc_{}", tool_calls.len())),
                    name: fc.name,
                    arguments,
                });
            }
        }

        let finish_reason = if tool_calls.is_empty() {
            candidate.finish_reason.as_deref().map(Self::convert_finish_reason)
        } else {
            Some(FinishReason::ToolUse)
        };

        Ok(Completion {
            content: text.concat(),
            tool_calls,
            model: model.to_string(),
            usage: response.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count.unwrap_or(0),
                completion_tokens: u.candidates_token_count.unwrap_or(0),
                total_tokens: u.total_token_count.unwrap_or(0),
            }),
            finish_reason,
        })
    }

    fn convert_finish_reason(reason: &str) -> FinishReason {
        match reason {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::Length,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
                FinishReason::ContentFilter
            }
            _ => FinishReason::Error,
        }
    }

    /// Map a non-success HTTP status to an agent error
    fn status_error(status: StatusCode, body: &str) -> AgentError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(message),
            StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(message),
            s if s.is_server_error() => AgentError::ProviderUnavailable(format!("{s}: {message}")),
            s => AgentError::Provider(format!("Gemini API error ({s}): {message}")),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = Self::build_request(messages, tools, options);
        let url = self.url(&format!("models/{}:generateContent", options.model));

        tracing::debug!(model = %options.model, messages = messages.len(), tools = tools.len(), "Gemini request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, &body));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("Malformed Gemini response: {e}")))?;

        Self::convert_completion(body, &options.model)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(self.url("models"))
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, &body));
        }

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("Malformed model list: {e}")))?;

        Ok(list
            .models
            .into_iter()
            .map(|m| ModelInfo {
                id: m.name.trim_start_matches("models/").to_string(),
                name: m.display_name.unwrap_or(m.name),
                context_length: m.input_token_limit,
            })
            .collect())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    display_name: Option<String>,
    input_token_limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
