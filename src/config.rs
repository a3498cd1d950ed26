use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::types::LLMProvider;

pub const DEFAULT_ROUTING_RULES: &str = "Invoice=Accounts Payable,\
Purchase Order=Procurement,\
Contract=Legal,\
Expense Report=Finance,\
Other=Back Office (Review)";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub ingest: IngestConfig,
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub openrouter_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl LLMConfig {
    /// API key for the configured provider, if one was supplied
    pub fn active_api_key(&self) -> Option<String> {
        match self.provider {
            LLMProvider::OpenRouter => self.openrouter_api_key.clone(),
            LLMProvider::OpenAI => self.openai_api_key.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    pub max_upload_bytes: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub large_document_threshold: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            chunk_size: 2000,
            chunk_overlap: 200,
            large_document_threshold: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// `category=destination` pairs separated by commas
    pub rules: String,
    pub default_category: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            rules: DEFAULT_ROUTING_RULES.to_string(),
            default_category: "Other".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let provider_name = env::var("LLM_PROVIDER").unwrap_or_else(|_| "openrouter".to_string());
        let provider = LLMProvider::from_name(&provider_name)
            .with_context(|| format!("Unsupported LLM_PROVIDER: {}", provider_name))?;

        let ingest_defaults = IngestConfig::default();
        let routing_defaults = RoutingConfig::default();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            llm: LLMConfig {
                provider,
                openrouter_api_key: api_key_from(&["OPENROUTER_API_KEY", "OPENROUTERAI_API_KEY"]),
                openai_api_key: api_key_from(&["OPENAI_API_KEY"]),
                base_url: env::var("LLM_BASE_URL").ok().filter(|url| !url.trim().is_empty()),
                model: env::var("LLM_MODEL").unwrap_or_else(|_| "openai/gpt-5".to_string()),
                timeout_secs: parse_var("LLM_TIMEOUT_SECS", 60)?,
            },
            ingest: IngestConfig {
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", ingest_defaults.max_upload_bytes)?,
                chunk_size: parse_var("CHUNK_SIZE", ingest_defaults.chunk_size)?,
                chunk_overlap: parse_var("CHUNK_OVERLAP", ingest_defaults.chunk_overlap)?,
                large_document_threshold: parse_var(
                    "LARGE_DOCUMENT_THRESHOLD",
                    ingest_defaults.large_document_threshold,
                )?,
            },
            routing: RoutingConfig {
                rules: env::var("ROUTING_RULES").unwrap_or(routing_defaults.rules),
                default_category: env::var("ROUTING_DEFAULT_CATEGORY")
                    .unwrap_or(routing_defaults.default_category),
            },
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        Err(_) => Ok(default),
    }
}

/// First variable in `names` holding a non-blank key
fn api_key_from(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| env::var(name).ok().and_then(|raw| clean_api_key(&raw)))
}

/// Keys pasted into `.env` files often keep their quotes
fn clean_api_key(raw: &str) -> Option<String> {
    let key = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}
