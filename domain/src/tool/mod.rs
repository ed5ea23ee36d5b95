//! Tool domain module
//!
//! This module defines how the model asks for local actions and how those
//! requests are represented, independently of how they are carried out.
//!
//! # Overview
//!
//! The model has no structured function-calling channel; it writes
//! invocations into its plain-text reply. Turning that text into executable
//! calls happens in two pure steps:
//!
//! ```text
//!   response text
//!        │
//!        ▼
//! ┌──────────────┐   Invocation { tool_name, raw_arguments, source_span }
//! │ Call Locator │──────────────────────────┐
//! │ (invocation) │                          │
//! └──────────────┘                          ▼
//!                                   ┌────────────────┐
//!                                   │ Arg. Splitter  │──▶ ToolCall
//!                                   │ (arguments)    │    (positional strings)
//!                                   └────────────────┘
//! ```
//!
//! Every tool is described by a [`ToolDefinition`] in a [`ToolSpec`], invoked
//! via a [`ToolCall`], and returns a [`ToolResult`].
//!
//! # Escapes
//!
//! Neither step decodes escape sequences: `"a\nb"` reaches the tool as the
//! four characters `a`, `\`, `n`, `b`. Only tools that write file content
//! decode them, via [`escape::unescape_content`].
//!
//! # Risk-Based Execution
//!
//! | Risk | Examples | Approval |
//! |------|----------|----------|
//! | **Low** | `read_file`, `list_files`, `add_todo` | Never asked |
//! | **High** | `write_file`, `edit_file`, `run_command` | Asked when auto-execution is off |
//!
//! # Architecture
//!
//! - **Domain** (this module): syntax, definitions and results, no I/O
//! - **Application** (`ToolExecutorPort`, dispatch use case)
//! - **Infrastructure** (`LocalToolExecutor`): file I/O and process spawning

pub mod arguments;
pub mod entities;
pub mod escape;
pub mod invocation;
pub mod traits;
pub mod value_objects;

pub use arguments::split_arguments;
pub use entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use escape::unescape_content;
pub use invocation::{Invocation, ToolCallSyntax, locate_invocations, strip_invocations};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
