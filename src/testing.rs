// Test doubles shared by unit tests

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::{Config, IngestConfig, LLMConfig, RoutingConfig, ServerConfig};
use crate::llm::LLMAdapter;
use crate::routing::RoutingTable;
use crate::types::{AppResult, LLMProvider, LLMRequest, LLMResponse, TokenUsage};

type Responder = dyn Fn(&LLMRequest) -> AppResult<String> + Send + Sync;

/// Adapter that answers from a closure and records every request
pub struct ScriptedAdapter {
    respond: Box<Responder>,
    calls: AtomicUsize,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedAdapter {
    pub fn new<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&LLMRequest) -> AppResult<String> + Send + Sync + 'static,
    {
        Arc::new(Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always replies with the same text
    pub fn fixed(reply: &str) -> Arc<Self> {
        let reply = reply.to_string();
        Self::new(move |_| Ok(reply.clone()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMAdapter for ScriptedAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let content = (self.respond)(request)?;
        Ok(LLMResponse {
            content,
            finish_reason: "stop".to_string(),
            usage: TokenUsage::default(),
        })
    }
}

/// Last user message of a request
pub fn user_text(request: &LLMRequest) -> &str {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}

pub fn queue_table() -> RoutingTable {
    RoutingTable::new(
        [
            ("finance", "finance-queue"),
            ("legal", "legal-queue"),
            ("other", "review-queue"),
        ],
        "other",
    )
    .unwrap()
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            port: 8000,
            host: "127.0.0.1".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
        },
        llm: LLMConfig {
            provider: LLMProvider::OpenRouter,
            openrouter_api_key: Some("sk-or-test".to_string()),
            openai_api_key: None,
            base_url: None,
            model: "test-model".to_string(),
            timeout_secs: 5,
        },
        ingest: IngestConfig::default(),
        routing: RoutingConfig::default(),
    }
}

/// In-memory PDF with one line of text per page
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for line in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
