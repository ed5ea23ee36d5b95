//! LLM Gateway port
//!
//! Defines the interface for communicating with the inference backend.

use async_trait::async_trait;
use codeagent_domain::{Model, ModelOptions, StreamEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One text-completion request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: Model,
    /// Fully rendered prompt (system text, history and user input)
    pub prompt: String,
    pub options: ModelOptions,
}

impl GenerateRequest {
    pub fn new(model: Model, prompt: impl Into<String>) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            options: ModelOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }
}

/// A model installed on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    /// Size on disk in bytes
    #[serde(default)]
    pub size: u64,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Size in gigabytes, for display
    pub fn size_gb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0 * 1024.0)
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to the model backend.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Start a streaming generation.
    ///
    /// Errors that happen before the first chunk (connection refused, HTTP
    /// status) are returned here; errors mid-stream arrive as
    /// [`StreamEvent::Error`].
    async fn generate_streaming(&self, request: &GenerateRequest)
    -> Result<StreamHandle, GatewayError>;

    /// List installed models
    async fn available_models(&self) -> Result<Vec<ModelInfo>, GatewayError>;

    /// Generate and wait for the full text.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GatewayError> {
        self.generate_streaming(request).await?.collect_text().await
    }
}

/// Handle for receiving streaming events from a generation.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
#[derive(Debug)]
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// A handle that yields `text` as a single completed event.
    pub fn from_text(text: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // Capacity 1 and a fresh channel: never full
        let _ = tx.try_send(StreamEvent::Completed(text.into()));
        Self::new(rx)
    }

    /// Consume the stream, calling `on_delta` for every text chunk, and return
    /// the full text.
    ///
    /// If the stream ends with `Completed` and no deltas were seen, the
    /// completed text is returned (and reported once through `on_delta`).
    pub async fn consume<F>(mut self, mut on_delta: F) -> Result<String, GatewayError>
    where
        F: FnMut(&str),
    {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    on_delta(&chunk);
                    full_text.push_str(&chunk);
                }
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() && !text.is_empty() {
                        on_delta(&text);
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
            }
        }
        // Channel closed without Completed: return what we have
        Ok(full_text)
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(self) -> Result<String, GatewayError> {
        self.consume(|_| {}).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_consume_forwards_deltas() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("Hel".into())).await.unwrap();
        tx.send(StreamEvent::Delta("lo".into())).await.unwrap();
        tx.send(StreamEvent::Completed("Hello".into())).await.unwrap();
        drop(tx);

        let mut seen = Vec::new();
        let text = StreamHandle::new(rx)
            .consume(|chunk| seen.push(chunk.to_string()))
            .await
            .unwrap();

        assert_eq!(text, "Hello");
        assert_eq!(seen, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_completed_only() {
        let text = StreamHandle::from_text("whole").collect_text().await.unwrap();
        assert_eq!(text, "whole");
    }

    #[tokio::test]
    async fn test_error_event() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("part".into())).await.unwrap();
        tx.send(StreamEvent::Error("boom".into())).await.unwrap();
        drop(tx);

        let err = StreamHandle::new(rx).collect_text().await.unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(msg) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_closed_without_completed() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("partial".into())).await.unwrap();
        drop(tx);

        assert_eq!(StreamHandle::new(rx).collect_text().await.unwrap(), "partial");
    }

    #[test]
    fn test_model_info_size() {
        let info = ModelInfo::new("llama3:8b", 4 * 1024 * 1024 * 1024);
        assert!((info.size_gb() - 4.0).abs() < f64::EPSILON);
    }
}
