//! Conversation transcripts.
//!
//! Provides [`JsonlConversationLogger`], the JSONL file implementation of the
//! [`ConversationLogger`](codeagent_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
