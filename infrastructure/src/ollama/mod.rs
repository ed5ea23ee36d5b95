//! Ollama adapter
//!
//! Implements [`LlmGateway`](codeagent_application::LlmGateway) over the
//! Ollama HTTP API: `POST /api/generate` streamed as newline-delimited JSON,
//! and `GET /api/tags` for the installed models.

pub mod error;
pub mod gateway;
pub mod protocol;

pub use error::OllamaError;
pub use gateway::OllamaGateway;
pub use protocol::NdjsonDecoder;
