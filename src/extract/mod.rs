mod gemini;

pub use gemini::GeminiExtractor;

use crate::error::AppResult;
use async_trait::async_trait;
use std::path::Path;
use tracing::warn;

/// One uploaded timetable document destined for the extraction service
#[derive(Debug, Clone)]
pub struct ScheduleDocument {
    /// MIME type of the payload ("image/png", "image/jpeg", ...)
    pub mime_type: String,
    /// Raw bytes of the document
    pub data: Vec<u8>,
}

impl ScheduleDocument {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read a document from disk, guessing the MIME type from the extension
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let mime_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            // schedules arrive overwhelmingly as phone photos
            _ => "image/jpeg",
        };
        Ok(Self::new(mime_type, std::fs::read(path)?))
    }
}

/// Upstream AI extraction collaborator. Implementations return the raw
/// response text; the pipeline treats it as untrusted and parses it
/// defensively downstream.
#[async_trait]
pub trait ScheduleExtractor: Send + Sync {
    /// Extract timetable text from a set of documents in one call
    async fn extract(&self, docs: &[ScheduleDocument]) -> AppResult<String>;
}

/// Run one extraction call per document, sequentially. A failing document is
/// logged and skipped so the documents already extracted (and those still to
/// come) keep contributing slots.
pub async fn extract_each(
    extractor: &dyn ScheduleExtractor,
    docs: &[ScheduleDocument],
) -> Vec<String> {
    let mut results = Vec::new();
    for (i, doc) in docs.iter().enumerate() {
        match extractor.extract(std::slice::from_ref(doc)).await {
            Ok(text) => results.push(text),
            Err(e) => warn!("Extraction failed for document {}: {}", i + 1, e),
        }
    }
    results
}
