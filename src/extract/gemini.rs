use super::{ScheduleDocument, ScheduleExtractor};
use crate::config::Config;
use crate::error::{extraction_error, AppResult};
use async_trait::async_trait;
use base64::{self, engine::Engine};
use rig::completion::message::{Image, ImageMediaType};
use rig::completion::{Chat, Message};
use rig::message::ContentFormat;
use rig::providers::gemini::Client as GeminiClient;
use tracing::info;

/// Prompt for the raw timetable grid extraction.
const PROMPT: &str = "You are a raw data extractor for university timetables. The attached image(s) show weekly timetable grids.

Convert the visual grid into one flat JSON list covering every active time slot. Do NOT filter anything.

Rules:
1. Identify the day headers (MON, TUE, ...) and the hourly column headers (8-9, 9-10, ...).
2. Visit every day/time intersection that holds content.
3. When a cell stacks several distinct classes vertically, extract the text of each stack item and join the items with exactly \" || \" (space pipe pipe space).
4. When one visual block spans several column headers, emit a separate entry per covered hourly column, each carrying the same text.
5. The raw_content string must keep everything written in the block: course codes, session type (L/P), group labels, professors, rooms.

Output a JSON array only, each element shaped as:
{ \"day\": \"MON\", \"time\": \"8-9\", \"raw_content\": \"E1 L PE308 GET PROF.NAVEEN || L PE308 GET PROF.ANIL\" }

The response must start with [ and end with ]. No prose, no markdown fences.";

/// Preamble for the Gemini agent
const PREAMBLE: &str =
    "You are a helpful assistant that transcribes university timetable grids from images.";

/// Extraction service backed by Google Gemini
pub struct GeminiExtractor {
    api_key: String,
    model: String,
}

impl GeminiExtractor {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Build an extractor from the loaded configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self::new(config.require_api_key()?, &config.gemini_model))
    }
}

#[async_trait]
impl ScheduleExtractor for GeminiExtractor {
    async fn extract(&self, docs: &[ScheduleDocument]) -> AppResult<String> {
        if docs.is_empty() {
            return Err(extraction_error("No documents to extract"));
        }
        info!(
            "Sending {} document(s) to Gemini model {}",
            docs.len(),
            self.model
        );

        // Base64 encode each document into an image message
        let messages: Vec<Message> = docs
            .iter()
            .map(|doc| {
                let image = Image {
                    data: base64::engine::general_purpose::STANDARD.encode(&doc.data),
                    media_type: Some(media_type(&doc.mime_type)),
                    format: Some(ContentFormat::Base64),
                    detail: None,
                };
                Message::from(image)
            })
            .collect();

        let gemini_client = GeminiClient::new(&self.api_key);
        let agent = gemini_client
            .agent(&self.model)
            .preamble(PREAMBLE)
            .temperature(0.0)
            .build();

        let response = agent
            .chat(PROMPT.to_string(), messages)
            .await
            .map_err(|err| extraction_error(&format!("Failed to complete request: {}", err)))?;

        info!("Received {} bytes of extraction text", response.len());
        Ok(response)
    }
}

fn media_type(mime: &str) -> ImageMediaType {
    match mime {
        "image/png" => ImageMediaType::PNG,
        "image/webp" => ImageMediaType::WEBP,
        "image/gif" => ImageMediaType::GIF,
        _ => ImageMediaType::JPEG,
    }
}
