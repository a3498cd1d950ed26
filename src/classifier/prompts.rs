// Prompt templates for classification and summarisation

pub const CLASSIFICATION_SYSTEM_MESSAGE: &str =
    "You are a document classification expert. Always respond with valid JSON.";

pub const SUMMARIZATION_SYSTEM_MESSAGE: &str =
    "You are a document analysis expert. Provide clear, concise summaries.";

pub const CLASSIFICATION_TEMPERATURE: f32 = 0.1;
pub const SUMMARIZATION_TEMPERATURE: f32 = 0.1;
pub const CLASSIFICATION_MAX_TOKENS: u32 = 4000;
pub const SUMMARIZATION_MAX_TOKENS: u32 = 800;

pub const CHUNK_SEPARATOR: &str = "\n\n--- CHUNK SEPARATOR ---\n\n";

pub fn classification_prompt(categories: &[&str], text: &str) -> String {
    format!(
        r#"Analyze the following document text and classify it into one of these categories: {categories}

Document text:
{text}

Based on the content, determine:
1. Which category this document belongs to
2. Your confidence level (0.0 to 1.0)
3. A brief summary of the document (2-3 sentences)

Respond in JSON format with the following structure:
{{
    "category": "exact category name from the list",
    "confidence": confidence_score,
    "summary": "brief summary of the document"
}}"#,
        categories = categories.join(", "),
        text = text,
    )
}

pub fn summarization_prompt(chunks: &[String]) -> String {
    format!(
        r#"Analyze the following document chunks and provide a comprehensive summary that captures:
1. The document type and purpose
2. Key information and topics covered
3. Important details that would help classify this document

Document chunks:
{combined}

Provide a clear, concise summary in 3-4 sentences that would help classify this document."#,
        combined = chunks.join(CHUNK_SEPARATOR),
    )
}
