//! Application layer for codeagent
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AgentSettings, DEFAULT_DANGEROUS_COMMANDS};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, GenerateRequest, LlmGateway, ModelInfo, StreamHandle},
    response_display::{NoDisplay, ResponseDisplay},
    tool_approval::{
        ApprovalError, ApprovalReason, ApprovalRequest, AutoApprove, AutoReject,
        ToolApprovalPort,
    },
    tool_executor::ToolExecutorPort,
};
pub use use_cases::chat_session::{ChatError, ChatSession, ChatTurn};
pub use use_cases::dispatch_tools::{
    COMMAND_TOOL, DispatchToolsUseCase, OutcomeKind, ProcessedResponse, ToolOutcome,
};
