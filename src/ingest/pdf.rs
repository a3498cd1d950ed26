// PDF text extraction backed by lopdf

use lopdf::Document;
use tracing::{debug, info, warn};

use crate::types::{AppError, AppResult};

/// Extract the text of every page, joined with newlines.
///
/// Pages that fail to extract are skipped. Encrypted files, unparseable files
/// and files where no page could be read are extraction errors.
pub fn extract_text(bytes: &[u8]) -> AppResult<String> {
    let document = Document::load_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("failed to read PDF: {}", e)))?;

    if document.is_encrypted() {
        return Err(AppError::Extraction("PDF is encrypted".to_string()));
    }

    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(AppError::Extraction("PDF has no pages".to_string()));
    }
    info!(pages = pages.len(), "Extracting text from PDF");

    let mut text = String::new();
    let mut extracted_pages = 0usize;
    for &page_number in pages.keys() {
        match document.extract_text(&[page_number]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
                extracted_pages += 1;
                debug!(page = page_number, "Extracted page text");
            }
            Err(e) => {
                warn!(page = page_number, error = %e, "Failed to extract page text");
            }
        }
    }

    if extracted_pages == 0 {
        return Err(AppError::Extraction(
            "no page of the PDF could be read".to_string(),
        ));
    }

    let text = text.trim().to_string();
    info!(chars = text.chars().count(), pages = extracted_pages, "PDF text extracted");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_pdf;

    #[test]
    fn test_extracts_every_page_in_order() {
        let bytes = sample_pdf(&["invoice #123", "Total due 40"]);
        let text = extract_text(&bytes).unwrap();

        let first = text.find("invoice #123").unwrap();
        let second = text.find("Total due 40").unwrap();
        assert!(first < second);
        assert!(text.contains('\n'));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = extract_text(b"plain words, not a PDF").unwrap_err();
        assert!(matches!(err, AppError::Extraction(ref m) if m.starts_with("failed to read PDF")));
    }

    #[test]
    fn test_rejects_truncated_pdf() {
        let err = extract_text(b"%PDF-1.5\n1 0 obj\n<< /Type /Catalog").unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
