//! Interactive agent front end
//!
//! [`AgentRepl`] drives a chat session from a readline prompt;
//! [`ConsoleApproval`] asks the user before risky tool calls run.

mod approval;
mod repl;

pub use approval::ConsoleApproval;
pub use repl::{AgentRepl, ModelResolver, ReplCommand, resolve_directory};
