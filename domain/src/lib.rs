//! Domain layer for codeagent
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool-call syntax
//!
//! The model requests local actions by writing `TOOL[name](args)` into its
//! reply. The [`tool::invocation`] scanner finds those invocations and the
//! [`tool::arguments`] splitter turns each argument list into positional
//! strings. Both are pure functions of their input text.
//!
//! ## Conversation
//!
//! A chat session keeps a [`ConversationHistory`]; only a short window of it
//! is replayed to the model on each turn.
//!
//! ## Todos
//!
//! A [`TodoList`] the model maintains through its todo tools.

pub mod core;
pub mod prompt;
pub mod session;
pub mod todo;
pub mod tool;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    model::{Model, ModelOptions},
    string::{format_size, truncate_bytes, truncate_chars},
};
pub use prompt::AgentPromptTemplate;
pub use session::{
    entities::{ConversationHistory, Message, Role},
    stream::StreamEvent,
};
pub use todo::{TodoItem, TodoList, TodoStatus};
pub use tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    invocation::{DEFAULT_MARKER, Invocation, ToolCallSyntax, locate_invocations, strip_invocations},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
