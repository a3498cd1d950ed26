// OpenRouter adapter
// OpenRouter exposes an OpenAI-compatible API, so this wraps the OpenAI adapter
// with its own base URL and attribution headers.

use crate::llm::openai::OpenAIAdapter;
use crate::llm::provider::LLMAdapter;
use crate::types::{AppResult, LLMRequest, LLMResponse};
use async_trait::async_trait;
use std::time::Duration;

pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

pub struct OpenRouterAdapter {
    inner: OpenAIAdapter,
}

impl OpenRouterAdapter {
    pub fn new(api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        Self::new_with_api_base(api_key, OPENROUTER_API_BASE, timeout)
    }

    pub fn new_with_api_base(
        api_key: Option<String>,
        api_base: &str,
        timeout: Duration,
    ) -> AppResult<Self> {
        let inner = OpenAIAdapter::new_with_api_base(api_key, api_base, timeout)?
            .with_provider_label("OpenRouter")
            .with_header("X-Title", "Document Classifier");
        Ok(Self { inner })
    }

    pub fn api_base(&self) -> &str {
        self.inner.api_base()
    }
}

#[async_trait]
impl LLMAdapter for OpenRouterAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.inner.create_chat_completion(request).await
    }
}
