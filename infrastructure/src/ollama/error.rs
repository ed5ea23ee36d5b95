//! Error types for the Ollama adapter

use codeagent_application::ports::llm_gateway::GatewayError;
use thiserror::Error;

/// Errors that can occur when talking to the Ollama HTTP API
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Cannot connect to Ollama at {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ollama returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to parse response line: {error}\nRaw line: {raw}")]
    ParseError { error: String, raw: String },
}

impl OllamaError {
    /// Classify a transport error from reqwest.
    pub(crate) fn from_request(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            OllamaError::Timeout
        } else if error.is_connect() {
            OllamaError::Connect {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            OllamaError::Http(error)
        }
    }
}

impl From<OllamaError> for GatewayError {
    fn from(error: OllamaError) -> Self {
        match error {
            OllamaError::Connect { .. } => GatewayError::ConnectionError(error.to_string()),
            OllamaError::Timeout => GatewayError::Timeout,
            OllamaError::ModelNotFound(model) => GatewayError::ModelNotAvailable(model),
            OllamaError::ParseError { .. } => GatewayError::InvalidResponse(error.to_string()),
            OllamaError::Http(_) | OllamaError::Status { .. } => {
                GatewayError::RequestFailed(error.to_string())
            }
        }
    }
}
