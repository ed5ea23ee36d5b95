//! Presentation layer for codeagent
//!
//! This crate contains the CLI definition, the interactive REPL, the live
//! turn display and console formatting.

pub mod agent;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use agent::{AgentRepl, ConsoleApproval, ModelResolver, ReplCommand};
pub use cli::commands::Cli;
pub use config::{OutputConfig, ReplConfig};
pub use output::console::ConsoleFormatter;
pub use progress::display::ConsoleDisplay;
