//! Classification Client and pipeline
//!
//! `ClassificationClient` talks to the LLM; `DocumentClassifier` wires the
//! ingestor, the client and the routing table into the single-pass flow
//! used by the HTTP layer:
//!
//! upload -> Document -> ClassificationResult -> RoutingDecision

pub mod parse;
pub mod prompts;

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{Config, IngestConfig};
use crate::ingest::{chunker::representative_chunks, Ingestor, TextChunker, Upload};
use crate::llm::{create_adapter, LLMAdapter};
use crate::routing::{RoutingDecision, RoutingTable};
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest};

/// Above this many chunks only representative chunks are summarised
const MANY_CHUNKS: usize = 10;
/// Chunks used for moderately large documents
const LEADING_CHUNKS: usize = 5;
/// Combined leading chunks longer than this are summarised first
const SUMMARIZE_ABOVE_CHARS: usize = 8000;

const EMPTY_DOCUMENT_SUMMARY: &str = "No readable text found in document";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: String,
    pub confidence: Option<f32>,
    pub summary: Option<String>,
}

pub struct ClassificationClient {
    llm: Arc<dyn LLMAdapter>,
    model: String,
}

impl ClassificationClient {
    pub fn new(llm: Arc<dyn LLMAdapter>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Ask the model which of the table's categories `text` belongs to
    pub async fn classify(&self, text: &str, table: &RoutingTable) -> AppResult<ClassificationResult> {
        info!(model = %self.model, chars = text.chars().count(), "Classifying document");

        let request = LLMRequest {
            model: self.model.clone(),
            messages: vec![
                LLMMessage::system(prompts::CLASSIFICATION_SYSTEM_MESSAGE),
                LLMMessage::user(prompts::classification_prompt(&table.categories(), text)),
            ],
            max_tokens: Some(prompts::CLASSIFICATION_MAX_TOKENS),
            temperature: Some(prompts::CLASSIFICATION_TEMPERATURE),
        };

        let response = self.llm.create_chat_completion(&request).await?;
        let result = parse::parse_classification(&response.content, table)?;

        info!(
            category = %result.category,
            confidence = ?result.confidence,
            tokens = response.usage.total_tokens,
            "Document classified"
        );
        Ok(result)
    }

    /// Condense several chunks into a short summary for classification
    pub async fn summarize_chunks(&self, chunks: &[String]) -> AppResult<String> {
        info!(model = %self.model, chunks = chunks.len(), "Summarizing chunks");

        let request = LLMRequest {
            model: self.model.clone(),
            messages: vec![
                LLMMessage::system(prompts::SUMMARIZATION_SYSTEM_MESSAGE),
                LLMMessage::user(prompts::summarization_prompt(chunks)),
            ],
            max_tokens: Some(prompts::SUMMARIZATION_MAX_TOKENS),
            temperature: Some(prompts::SUMMARIZATION_TEMPERATURE),
        };

        let response = self.llm.create_chat_completion(&request).await?;
        let summary = response.content.trim();
        if summary.is_empty() {
            return Err(AppError::Provider("model returned an empty summary".to_string()));
        }
        Ok(summary.to_string())
    }
}

/// Everything produced for one upload
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationOutcome {
    pub document_id: Uuid,
    pub filename: Option<String>,
    pub classification: ClassificationResult,
    pub decision: RoutingDecision,
}

pub struct DocumentClassifier {
    ingestor: Ingestor,
    chunker: TextChunker,
    client: ClassificationClient,
    routing: RoutingTable,
}

impl DocumentClassifier {
    pub fn new(
        ingest: &IngestConfig,
        routing: RoutingTable,
        llm: Arc<dyn LLMAdapter>,
        model: impl Into<String>,
    ) -> Self {
        info!(rules = routing.rules().len(), "Document classifier initialized");
        Self {
            ingestor: Ingestor::new(ingest),
            chunker: TextChunker::from_config(ingest),
            client: ClassificationClient::new(llm, model),
            routing,
        }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        if config.llm.active_api_key().is_none() {
            warn!(provider = %config.llm.provider, "No LLM API key configured; classification requests will fail");
        }
        let llm = create_adapter(&config.llm)?;
        let routing = RoutingTable::from_config(&config.routing)?;
        Ok(Self::new(&config.ingest, routing, llm, config.llm.model.clone()))
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.ingestor.max_upload_bytes()
    }

    /// Ingest, classify and route one upload
    pub async fn classify_upload(&self, upload: Upload) -> AppResult<ClassificationOutcome> {
        let document = self.ingestor.ingest(upload).await?;

        let classification = self.classify_text(&document.text).await?;
        let decision = self.routing.route(&classification.category);

        info!(
            document_id = %document.id,
            category = %decision.category,
            destination = %decision.destination,
            "Routing decision made"
        );

        Ok(ClassificationOutcome {
            document_id: document.id,
            filename: document.filename,
            classification,
            decision,
        })
    }

    /// Classify extracted text, summarising long documents first
    pub async fn classify_text(&self, text: &str) -> AppResult<ClassificationResult> {
        if text.trim().is_empty() {
            warn!("No text extracted from document");
            return Ok(ClassificationResult {
                category: self.routing.default_category().to_string(),
                confidence: Some(0.0),
                summary: Some(EMPTY_DOCUMENT_SUMMARY.to_string()),
            });
        }

        if !self.chunker.is_large(text) {
            return self.client.classify(text, &self.routing).await;
        }

        let chunks = self.chunker.chunk(text);
        info!(chunks = chunks.len(), "Large document, classifying from chunks");

        if chunks.len() > MANY_CHUNKS {
            let picked = representative_chunks(&chunks);
            info!(picked = picked.len(), "Using representative chunks");
            let summary = self.client.summarize_chunks(&picked).await?;
            return self.client.classify(&summary, &self.routing).await;
        }

        let leading: Vec<String> = chunks.into_iter().take(LEADING_CHUNKS).collect();
        let combined = leading.join("\n\n");
        if combined.chars().count() > SUMMARIZE_ABOVE_CHARS {
            let summary = self.client.summarize_chunks(&leading).await?;
            self.client.classify(&summary, &self.routing).await
        } else {
            self.client.classify(&combined, &self.routing).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{queue_table, sample_pdf, user_text, ScriptedAdapter};
    use bytes::Bytes;

    fn classifier(adapter: Arc<ScriptedAdapter>) -> DocumentClassifier {
        DocumentClassifier::new(&IngestConfig::default(), queue_table(), adapter, "test-model")
    }

    fn text_upload(text: &str) -> Upload {
        Upload {
            filename: Some("doc.txt".to_string()),
            content_type: Some("text/plain".to_string()),
            bytes: Bytes::copy_from_slice(text.as_bytes()),
        }
    }

    fn finance_for_invoices() -> Arc<ScriptedAdapter> {
        ScriptedAdapter::new(|request| {
            if user_text(request).contains("invoice #123") {
                Ok(r#"{"category": "finance", "confidence": 0.95, "summary": "An invoice."}"#.to_string())
            } else {
                Ok(r#"{"category": "other", "confidence": 0.4, "summary": "Unclear."}"#.to_string())
            }
        })
    }

    #[tokio::test]
    async fn test_invoice_routes_to_finance_queue() {
        let adapter = finance_for_invoices();
        let outcome = classifier(adapter.clone())
            .classify_upload(text_upload("invoice #123"))
            .await
            .unwrap();

        assert_eq!(outcome.decision.category, "finance");
        assert_eq!(outcome.decision.destination, "finance-queue");
        assert_eq!(outcome.classification.confidence, Some(0.95));
        assert_eq!(adapter.calls(), 1);

        let requests = adapter.requests();
        let request = &requests[0];
        assert_eq!(request.model, "test-model");
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.max_tokens, Some(4000));
        assert_eq!(request.messages[0].content, prompts::CLASSIFICATION_SYSTEM_MESSAGE);
        assert!(user_text(request).contains("finance, legal, other"));
    }

    #[tokio::test]
    async fn test_pdf_upload_routes_on_extracted_text() {
        let adapter = finance_for_invoices();
        let upload = Upload {
            filename: Some("invoice.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from(sample_pdf(&["invoice #123", "Total due 40"])),
        };

        let outcome = classifier(adapter.clone()).classify_upload(upload).await.unwrap();
        assert_eq!(outcome.filename.as_deref(), Some("invoice.pdf"));
        assert_eq!(outcome.decision.destination, "finance-queue");
        assert_eq!(adapter.calls(), 1);
        assert!(user_text(&adapter.requests()[0]).contains("Total due 40"));
    }

    #[tokio::test]
    async fn test_same_text_twice_gives_same_decision() {
        let classifier = classifier(finance_for_invoices());
        let first = classifier.classify_upload(text_upload("invoice #123")).await.unwrap();
        let second = classifier.classify_upload(text_upload("invoice #123")).await.unwrap();

        assert_eq!(first.decision, second.decision);
        assert_ne!(first.document_id, second.document_id);
    }

    #[tokio::test]
    async fn test_unsupported_format_never_reaches_provider() {
        let adapter = finance_for_invoices();
        let upload = Upload {
            filename: Some("photo.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"\x89PNG\r\n"),
        };

        let err = classifier(adapter.clone()).classify_upload(upload).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
        assert_eq!(adapter.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_timeout_produces_no_decision() {
        let adapter = ScriptedAdapter::new(|_| {
            Err(AppError::Provider("OpenRouter request timed out".to_string()))
        });
        let err = classifier(adapter).classify_upload(text_upload("invoice #123")).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(ref m) if m.contains("timed out")));
    }

    #[tokio::test]
    async fn test_unknown_category_uses_default_destination() {
        let adapter = ScriptedAdapter::fixed(r#"{"category": "marketing", "confidence": 0.8}"#);
        let outcome = classifier(adapter).classify_upload(text_upload("spring campaign")).await.unwrap();

        assert_eq!(outcome.decision.category, "marketing");
        assert_eq!(outcome.decision.destination, "review-queue");
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_parse_error() {
        let adapter = ScriptedAdapter::fixed("I am not able to help with that.");
        let err = classifier(adapter).classify_upload(text_upload("invoice #123")).await.unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[tokio::test]
    async fn test_empty_document_skips_provider() {
        let adapter = finance_for_invoices();
        let outcome = classifier(adapter.clone())
            .classify_upload(text_upload("   \n  "))
            .await
            .unwrap();

        assert_eq!(outcome.decision.destination, "review-queue");
        assert_eq!(outcome.classification.confidence, Some(0.0));
        assert_eq!(adapter.calls(), 0);
    }

    #[tokio::test]
    async fn test_moderately_large_document_classifies_leading_chunks() {
        let adapter = ScriptedAdapter::fixed(r#"{"category": "legal", "confidence": 0.9}"#);
        let text = "This clause binds both parties. ".repeat(150);
        let result = classifier(adapter.clone()).classify_text(&text).await.unwrap();

        assert_eq!(result.category, "legal");
        assert_eq!(adapter.calls(), 1);
        assert_eq!(adapter.requests()[0].messages[0].content, prompts::CLASSIFICATION_SYSTEM_MESSAGE);
    }

    #[tokio::test]
    async fn test_very_large_document_is_summarised_first() {
        let adapter = ScriptedAdapter::new(|request| {
            if request.messages[0].content == prompts::SUMMARIZATION_SYSTEM_MESSAGE {
                assert!(user_text(request).contains(prompts::CHUNK_SEPARATOR));
                Ok("A long master services agreement.".to_string())
            } else {
                assert!(user_text(request).contains("A long master services agreement."));
                Ok(r#"{"category": "legal", "confidence": 0.85}"#.to_string())
            }
        });
        let text = "The supplier shall deliver the goods on time. ".repeat(600);
        let result = classifier(adapter.clone()).classify_text(&text).await.unwrap();

        assert_eq!(result.category, "legal");
        assert_eq!(adapter.calls(), 2);
        assert_eq!(adapter.requests()[0].max_tokens, Some(prompts::SUMMARIZATION_MAX_TOKENS));
    }
}
