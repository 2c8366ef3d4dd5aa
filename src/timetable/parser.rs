use crate::timetable::model::{time_index, RawSlot};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

lazy_static! {
    /// Bracket-delimited array chunks, shortest match, across lines
    static ref ARRAY_CHUNK: Regex = Regex::new(r"(?s)\[.*?\]").unwrap();
    /// A line holding only a day marker, e.g. "MON:" or "Wednesday:"
    static ref DAY_MARKER: Regex =
        Regex::new(r"(?i)^(MON|TUE|WED|THU|FRI)(?:DAY|SDAY|NESDAY|RSDAY)?\s*:\s*$").unwrap();
    /// A line opening a time column, e.g. "8-9: L PE302"
    static ref TIME_MARKER: Regex = Regex::new(r"^(\d{1,2}\s*-\s*\d{1,2})\s*:\s*(.*)$").unwrap();
}

/// Placeholders the extraction service emits for cells it saw but found blank
const EMPTY_MARKERS: [&str; 3] = ["EMPTY", "-", "—"];

/// Parse a raw extraction response into atomic slot records.
///
/// Three shapes are tolerated, tried in order: the whole payload as one JSON
/// array (optionally fenced), any number of JSON arrays embedded in
/// surrounding prose (one per day in some responses), and a line-oriented
/// day/time marker layout. Input with no recognizable structure yields an
/// empty vector, never an error.
pub fn parse(text: &str) -> Vec<RawSlot> {
    if let Some(slots) = decode_array(strip_code_fences(text.trim())) {
        debug!("Decoded structured payload with {} slots", slots.len());
        return normalize(slots);
    }

    let mut slots = Vec::new();
    for chunk in ARRAY_CHUNK.find_iter(text) {
        match decode_array(chunk.as_str()) {
            Some(decoded) => slots.extend(decoded),
            None => {
                warn!(
                    "Skipping undecodable JSON chunk at offset {}",
                    chunk.start()
                );
            }
        }
    }
    if !slots.is_empty() {
        debug!("Decoded {} slots from embedded JSON chunks", slots.len());
        return normalize(slots);
    }

    parse_lines(text)
}

/// Strip a fenced code block wrapper from a model response
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.starts_with("```json") && trimmed.ends_with("```") {
        trimmed
            .trim_start_matches("```json")
            .trim_end_matches("```")
            .trim()
    } else if trimmed.starts_with("```") && trimmed.ends_with("```") {
        trimmed
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    } else {
        trimmed
    }
}

/// Decode one JSON array of slot records; a lone object is wrapped into a
/// single-element vector
fn decode_array(text: &str) -> Option<Vec<RawSlot>> {
    if let Ok(slots) = serde_json::from_str::<Vec<RawSlot>>(text) {
        return Some(slots);
    }
    serde_json::from_str::<RawSlot>(text).ok().map(|s| vec![s])
}

/// Uppercase day labels and trim; duplicates at the same (day, time) stay
fn normalize(slots: Vec<RawSlot>) -> Vec<RawSlot> {
    slots
        .into_iter()
        .map(|s| RawSlot {
            day: s.day.trim().to_uppercase(),
            time: s.time.trim().to_string(),
            raw_content: s.raw_content.trim().to_string(),
        })
        .filter(|s| !s.raw_content.is_empty())
        .collect()
}

/// Line-oriented fallback: day markers open a day section, time markers open
/// a cell, plain lines extend the current cell until the next marker
fn parse_lines(text: &str) -> Vec<RawSlot> {
    let mut slots = Vec::new();
    let mut day: Option<String> = None;
    let mut time: Option<String> = None;
    let mut content = String::new();

    let mut flush = |day: &Option<String>, time: &mut Option<String>, content: &mut String| {
        if let (Some(d), Some(t)) = (day, time.take()) {
            if !content.is_empty() {
                slots.push(RawSlot {
                    day: d.clone(),
                    time: t,
                    raw_content: std::mem::take(content),
                });
            }
        }
        content.clear();
    };

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(caps) = DAY_MARKER.captures(trimmed) {
            flush(&day, &mut time, &mut content);
            day = Some(caps[1].to_uppercase());
            continue;
        }
        if let Some(caps) = TIME_MARKER.captures(trimmed) {
            flush(&day, &mut time, &mut content);
            let label: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
            if time_index(&label).is_some() {
                time = Some(label);
                let rest = caps[2].trim();
                if !rest.is_empty() && !is_empty_marker(rest) {
                    content.push_str(rest);
                }
            }
            continue;
        }
        if day.is_some() && time.is_some() && !is_empty_marker(trimmed) {
            if !content.is_empty() {
                content.push(' ');
            }
            content.push_str(trimmed);
        }
    }
    flush(&day, &mut time, &mut content);

    slots
}

fn is_empty_marker(line: &str) -> bool {
    let upper = line.to_uppercase();
    EMPTY_MARKERS.iter().any(|m| *m == upper)
}
