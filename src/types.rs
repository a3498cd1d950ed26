// Type definitions, LLM wire-neutral types and the application error

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LLMProvider {
    OpenRouter,
    OpenAI,
}

impl LLMProvider {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Some(LLMProvider::OpenRouter),
            "openai" => Some(LLMProvider::OpenAI),
            _ => None,
        }
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::OpenAI => write!(f, "openai"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("LLM provider error: {0}")]
    Provider(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Stable machine-readable identifier used in error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat(_) => "unsupported_format",
            AppError::Extraction(_) => "extraction_error",
            AppError::Provider(_) => "provider_error",
            AppError::Parse(_) => "parse_error",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Config(_) => "config_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Provider(_) | AppError::Parse(_) => StatusCode::BAD_GATEWAY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        assert_eq!(LLMProvider::from_name("OpenRouter"), Some(LLMProvider::OpenRouter));
        assert_eq!(LLMProvider::from_name(" openai "), Some(LLMProvider::OpenAI));
        assert_eq!(LLMProvider::from_name("glm"), None);
        assert_eq!(LLMProvider::OpenRouter.to_string(), "openrouter");
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            AppError::UnsupportedFormat("image/png".into()).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            AppError::Extraction("bad xref".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::Provider("timeout".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::Parse("no json".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::PayloadTooLarge("11MB".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(AppError::Parse("x".into()).kind(), "parse_error");
    }
}
