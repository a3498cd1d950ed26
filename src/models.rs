use std::collections::BTreeMap;
use std::sync::Arc;

use crate::classifier::{ClassificationOutcome, DocumentClassifier};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub classifier: Arc<DocumentClassifier>,
}

impl AppState {
    pub fn new(config: Config, classifier: DocumentClassifier) -> Self {
        Self {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
        }
    }
}

// API response bodies

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassifyResponse {
    pub document_id: uuid::Uuid,
    pub filename: Option<String>,
    pub category: String,
    pub destination: String,
    pub confidence: Option<f32>,
    pub summary: Option<String>,
}

impl From<ClassificationOutcome> for ClassifyResponse {
    fn from(outcome: ClassificationOutcome) -> Self {
        Self {
            document_id: outcome.document_id,
            filename: outcome.filename,
            category: outcome.decision.category,
            destination: outcome.decision.destination,
            confidence: outcome.classification.confidence,
            summary: outcome.classification.summary,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RoutingRulesResponse {
    pub routing_rules: BTreeMap<String, String>,
    pub default_category: String,
    pub description: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub classify_endpoint: String,
    pub health_check: String,
    pub routing_rules: String,
}
