//! Document Ingestor
//!
//! Turns an uploaded file into a [`Document`]: checks the size, decides
//! whether the bytes are a PDF or plain text, and extracts the text.

pub mod chunker;
pub mod pdf;

use bytes::Bytes;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::types::{AppError, AppResult};

pub use chunker::TextChunker;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Raw upload as received from the HTTP layer
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    /// Detect the format of an upload.
    ///
    /// An explicit declared MIME type is authoritative. A missing or generic
    /// (`application/octet-stream`) type falls back to the filename extension
    /// and then to the `%PDF-` magic bytes.
    pub fn detect(
        content_type: Option<&str>,
        filename: Option<&str>,
        head: &[u8],
    ) -> AppResult<Self> {
        let declared = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .and_then(|ct| ct.parse::<mime::Mime>().ok());

        if let Some(declared) = declared.filter(|m| m.essence_str() != "application/octet-stream") {
            return Self::from_mime(&declared).ok_or_else(|| {
                AppError::UnsupportedFormat(format!(
                    "{} is not supported; upload a PDF or plain text file",
                    declared.essence_str()
                ))
            });
        }

        if let Some(format) = filename
            .and_then(|name| mime_guess::from_path(name).first())
            .and_then(|guessed| Self::from_mime(&guessed))
        {
            return Ok(format);
        }

        if head.starts_with(PDF_MAGIC) {
            return Ok(DocumentFormat::Pdf);
        }

        Err(AppError::UnsupportedFormat(format!(
            "could not identify {} as PDF or plain text",
            filename.unwrap_or("upload")
        )))
    }

    fn from_mime(m: &mime::Mime) -> Option<Self> {
        match m.essence_str() {
            "application/pdf" | "application/x-pdf" => Some(DocumentFormat::Pdf),
            "text/plain" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }
}

/// An uploaded document with its extracted text. Lives for one request.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub format: DocumentFormat,
    pub bytes: Bytes,
    pub text: String,
}

impl Document {
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Ingestor {
    max_upload_bytes: usize,
}

impl Ingestor {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub async fn ingest(&self, upload: Upload) -> AppResult<Document> {
        if upload.bytes.len() > self.max_upload_bytes {
            warn!(size = upload.bytes.len(), limit = self.max_upload_bytes, "Upload too large");
            return Err(AppError::PayloadTooLarge(format!(
                "file is {} bytes; the maximum is {} bytes",
                upload.bytes.len(),
                self.max_upload_bytes
            )));
        }

        let format = DocumentFormat::detect(
            upload.content_type.as_deref(),
            upload.filename.as_deref(),
            &upload.bytes,
        )?;

        let id = Uuid::new_v4();
        info!(
            document_id = %id,
            filename = upload.filename.as_deref().unwrap_or("<unnamed>"),
            format = ?format,
            size = upload.bytes.len(),
            "Ingesting document"
        );

        let text = match format {
            DocumentFormat::PlainText => decode_text(&upload.bytes),
            DocumentFormat::Pdf => {
                let bytes = upload.bytes.clone();
                tokio::task::spawn_blocking(move || pdf::extract_text(&bytes))
                    .await
                    .map_err(|e| AppError::Extraction(format!("PDF extraction task failed: {}", e)))??
            }
        };

        debug!(document_id = %id, chars = text.chars().count(), "Text extracted");

        Ok(Document {
            id,
            filename: upload.filename,
            content_type: upload.content_type,
            format,
            bytes: upload.bytes,
            text,
        })
    }
}

/// Decode plain text as UTF-8, falling back to Latin-1.
///
/// Latin-1 maps every byte to exactly one char, so the fallback cannot fail.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            info!("Text is not valid UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}
