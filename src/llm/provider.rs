use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LLMConfig;
use crate::types::{AppResult, LLMProvider, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Build the adapter for the configured provider
pub fn create_adapter(config: &LLMConfig) -> AppResult<Arc<dyn LLMAdapter>> {
    let api_key = config.active_api_key();
    let timeout = config.timeout();

    let adapter: Arc<dyn LLMAdapter> = match (config.provider, config.base_url.as_deref()) {
        (LLMProvider::OpenRouter, Some(base)) => Arc::new(
            crate::llm::openrouter::OpenRouterAdapter::new_with_api_base(api_key, base, timeout)?,
        ),
        (LLMProvider::OpenRouter, None) => {
            Arc::new(crate::llm::openrouter::OpenRouterAdapter::new(api_key, timeout)?)
        }
        (LLMProvider::OpenAI, Some(base)) => Arc::new(
            crate::llm::openai::OpenAIAdapter::new_with_api_base(api_key, base, timeout)?,
        ),
        (LLMProvider::OpenAI, None) => {
            Arc::new(crate::llm::openai::OpenAIAdapter::new(api_key, timeout)?)
        }
    };

    Ok(adapter)
}
