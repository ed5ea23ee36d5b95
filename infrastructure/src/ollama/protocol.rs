//! Wire types for the Ollama HTTP API.
//!
//! # Protocol Overview
//!
//! - `POST /api/generate` with `{model, prompt, stream: true, options}`;
//!   the body comes back as newline-delimited JSON, one
//!   `{"response": "...", "done": false}` object per chunk, ending with an
//!   object whose `done` is `true`
//! - `GET /api/tags` returns `{"models": [{"name", "size", ...}]}`
//! - Failures inside a stream arrive as `{"error": "..."}`

use super::error::OllamaError;
use codeagent_application::ports::llm_gateway::ModelInfo;
use codeagent_domain::{ModelOptions, StreamEvent};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateBody<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: &'a ModelOptions,
}

/// One line of a streamed generation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateChunk {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /api/tags`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn parse_chunk(line: &str) -> Result<GenerateChunk, OllamaError> {
    serde_json::from_str(line).map_err(|e| OllamaError::ParseError {
        error: e.to_string(),
        raw: line.to_string(),
    })
}

/// Turn one NDJSON line into stream events, appending any text to `full`.
///
/// Returns the events to forward and whether the stream is finished.
pub fn events_for_line(line: &str, full: &mut String) -> (Vec<StreamEvent>, bool) {
    let chunk = match parse_chunk(line) {
        Ok(chunk) => chunk,
        Err(e) => return (vec![StreamEvent::Error(e.to_string())], true),
    };

    if let Some(error) = chunk.error {
        return (vec![StreamEvent::Error(error)], true);
    }

    let mut events = Vec::new();
    if !chunk.response.is_empty() {
        full.push_str(&chunk.response);
        events.push(StreamEvent::Delta(chunk.response));
    }
    if chunk.done {
        events.push(StreamEvent::Completed(full.clone()));
    }
    (events, chunk.done)
}

/// Incremental splitter for newline-delimited JSON.
///
/// Network chunks can end in the middle of a line or even in the middle of a
/// multi-byte character, so bytes are buffered until a `\n` arrives. Blank
/// lines are dropped.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes; returns every line completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(text) = Self::decode(&line) {
                lines.push(text);
            }
        }
        lines
    }

    /// Whatever is left once the body has ended without a final newline.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        Self::decode(&rest)
    }

    fn decode(line: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(line);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
