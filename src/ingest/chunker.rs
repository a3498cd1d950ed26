//! Character-window chunking for long documents.
//!
//! Windows are measured in chars, not bytes. A window that is not the last
//! one is shortened to end on a sentence break near its tail, or failing
//! that on a space, so chunks rarely split words.

use std::collections::HashSet;
use tracing::debug;

use crate::config::IngestConfig;

/// How far back from a window's end to look for a sentence break
const SENTENCE_LOOKBACK: usize = 200;
/// How far back from a window's end to look for a space
const WORD_LOOKBACK: usize = 50;

const SENTENCE_BREAKS: [&str; 4] = [". ", "! ", "? ", "\n\n"];

#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    large_threshold: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize, large_threshold: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap,
            large_threshold,
        }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(
            config.chunk_size,
            config.chunk_overlap,
            config.large_document_threshold,
        )
    }

    pub fn is_large(&self, text: &str) -> bool {
        let chars = text.chars().count();
        let large = chars > self.large_threshold;
        debug!(chars, large, "Checked document size");
        large
    }

    /// Split text into overlapping chunks
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();

        if len <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < len {
            let mut end = (start + self.chunk_size).min(len);

            if end < len {
                let sentence_from = end.saturating_sub(SENTENCE_LOOKBACK);
                if let Some(pos) = last_sentence_break(&chars[sentence_from..end]) {
                    end = sentence_from + pos + 2;
                } else {
                    let word_from = end.saturating_sub(WORD_LOOKBACK);
                    if let Some(space) = chars[word_from..end].iter().rposition(|&c| c == ' ') {
                        end = word_from + space;
                    }
                }
            }

            if end > start {
                let chunk: String = chars[start..end].iter().collect();
                let chunk = chunk.trim();
                if !chunk.is_empty() {
                    chunks.push(chunk.to_string());
                }
            }

            if end >= len {
                break;
            }
            start = (start + 1).max(end.saturating_sub(self.chunk_overlap));
        }

        debug!(chunks = chunks.len(), "Text split into chunks");
        chunks
    }
}

/// Char offset of the last sentence break in `window`
fn last_sentence_break(window: &[char]) -> Option<usize> {
    SENTENCE_BREAKS
        .iter()
        .filter_map(|pattern| {
            let pattern: Vec<char> = pattern.chars().collect();
            window
                .windows(pattern.len())
                .rposition(|candidate| candidate == pattern.as_slice())
        })
        .max()
}

/// First three, middle two and last three chunks, without duplicates
pub fn representative_chunks(chunks: &[String]) -> Vec<String> {
    let n = chunks.len();
    let mut picked: Vec<&String> = Vec::new();

    picked.extend(chunks.iter().take(3));

    let mid_start = 3.max((n / 2).saturating_sub(1));
    let mid_end = n.saturating_sub(3).min(n / 2 + 1);
    if mid_start < mid_end {
        picked.extend(&chunks[mid_start..mid_end]);
    }

    picked.extend(&chunks[n.saturating_sub(3)..]);

    let mut seen = HashSet::new();
    picked
        .into_iter()
        .filter(|chunk| seen.insert(chunk.as_str()))
        .cloned()
        .collect()
}
