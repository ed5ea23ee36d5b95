//! Prompt domain
//!
//! Text sent to the model: the tool-teaching system prompt and the
//! per-turn conversation prompt.

pub mod agent;

pub use agent::AgentPromptTemplate;
