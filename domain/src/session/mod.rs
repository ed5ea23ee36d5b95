//! Conversation domain.
//!
//! - [`entities::Message`]: a single message within a conversation
//! - [`entities::ConversationHistory`]: the session's message log
//! - [`stream::StreamEvent`]: incremental output from the backend

pub mod entities;
pub mod stream;
