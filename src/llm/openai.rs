// OpenAI-compatible chat completions adapter
// Shared by every provider that speaks the `/chat/completions` wire format
// (OpenAI itself, OpenRouter).

use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

pub struct OpenAIAdapter {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    provider_label: &'static str,
    extra_headers: Vec<(&'static str, String)>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [LLMMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl OpenAIAdapter {
    pub fn new(api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        Self::new_with_api_base(api_key, OPENAI_API_BASE, timeout)
    }

    pub fn new_with_api_base(
        api_key: Option<String>,
        api_base: &str,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            provider_label: "OpenAI",
            extra_headers: Vec::new(),
        })
    }

    /// Name used in error messages
    pub fn with_provider_label(mut self, label: &'static str) -> Self {
        self.provider_label = label;
        self
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.extra_headers.push((name, value.into()));
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn request_error(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Provider(format!("{} request timed out: {}", self.provider_label, e))
        } else if e.is_connect() {
            AppError::Provider(format!("{} connection failed: {}", self.provider_label, e))
        } else {
            AppError::Provider(format!("{} request failed: {}", self.provider_label, e))
        }
    }
}

#[async_trait]
impl LLMAdapter for OpenAIAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Provider(format!("{} API key is not configured", self.provider_label))
        })?;

        let url = format!("{}/chat/completions", self.api_base);
        let body = ChatRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        debug!(model = %request.model, url = %url, "Sending chat completion request");

        let mut builder = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body);
        for (name, value) in &self.extra_headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(|e| self.request_error(e))?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                return Err(AppError::Provider(format!(
                    "{} API error ({}): {} (code: {:?})",
                    self.provider_label, status, error_response.error.message, error_response.error.code
                )));
            }

            return Err(AppError::Provider(format!(
                "{} API error ({}): {}",
                self.provider_label, status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.request_error(e)
            } else {
                AppError::Provider(format!("Failed to parse {} response: {}", self.provider_label, e))
            }
        })?;

        let choice = chat_response.choices.into_iter().next().ok_or_else(|| {
            AppError::Provider(format!("{} returned no choices", self.provider_label))
        })?;

        let usage = chat_response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }
}
