//! Infrastructure layer for codeagent
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Ollama HTTP gateway, the local tool
//! executor, configuration file loading and the JSONL transcript.

pub mod config;
pub mod logging;
pub mod ollama;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig, expand_home};
pub use logging::JsonlConversationLogger;
pub use ollama::{OllamaError, OllamaGateway};
pub use tools::{
    BuiltinTool, LocalToolExecutor, ToolContext, ToolLimits, default_tool_spec,
    read_only_tool_spec,
};
