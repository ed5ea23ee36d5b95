//! Response display port.
//!
//! The chat use case reports what happens during a turn through this sink
//! instead of writing to the terminal itself. The presentation layer renders
//! it (spinner, streamed tokens, tool lines); tests use [`NoDisplay`].
//!
//! Call order for one turn:
//!
//! ```text
//! on_stream_start
//!   on_token*            (zero or more)
//! on_stream_end
//! on_tools_start(n)      (only when n > 0)
//!   on_tool_call / on_tool_result | on_tool_skipped   (per invocation)
//! ```

use codeagent_domain::ToolResult;

/// Sink for the visible progress of a chat turn.
pub trait ResponseDisplay: Send + Sync {
    /// Generation requested; nothing received yet
    fn on_stream_start(&self) {}

    /// A chunk of model output arrived
    fn on_token(&self, _token: &str) {}

    /// Generation finished (successfully or not)
    fn on_stream_end(&self) {}

    /// `count` invocations were located in the response
    fn on_tools_start(&self, _count: usize) {}

    /// A known tool is about to run with these arguments
    fn on_tool_call(&self, _tool_name: &str, _args: &[String]) {}

    /// A tool finished
    fn on_tool_result(&self, _tool_name: &str, _result: &ToolResult) {}

    /// An invocation was not executed (unknown tool or rejected); `message`
    /// is the line added to the results
    fn on_tool_skipped(&self, _tool_name: &str, _message: &str) {}
}

/// No-op display.
pub struct NoDisplay;

impl ResponseDisplay for NoDisplay {}
