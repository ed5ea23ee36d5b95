//! Dispatch Tools use case.
//!
//! Turns one complete model response into executed tool calls and the text
//! shown to the user and stored in history:
//!
//! ```text
//! response ──▶ locate invocations ──▶ for each, in order:
//!                                       unknown name?   → "Error: Unknown tool 'x'"
//!                                       split arguments
//!                                       validate arity  → failure result
//!                                       needs approval? → "Skipped x: not approved"
//!                                       execute         → output | "Error executing x: ..."
//!          ──▶ cleaned text (invocations removed) + "\n\n" + results joined by "\n"
//! ```
//!
//! Invocations run strictly one after another; a slow tool delays the
//! next. Nothing here returns an error: every problem becomes a result line.

use crate::config::AgentSettings;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::response_display::ResponseDisplay;
use crate::ports::tool_approval::{ApprovalReason, ApprovalRequest, AutoApprove, ToolApprovalPort};
use crate::ports::tool_executor::ToolExecutorPort;
use codeagent_domain::tool::invocation::strip_invocations;
use codeagent_domain::{
    DefaultToolValidator, ToolCall, ToolCallSyntax, ToolDefinition, ToolError, ToolResult,
    ToolValidator, truncate_bytes,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name of the shell tool, whose first argument is checked against the
/// dangerous command list.
pub const COMMAND_TOOL: &str = "run_command";

/// What happened to one located invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeKind {
    /// The tool ran (successfully or not)
    Executed(ToolResult),
    /// No tool with that name is registered
    UnknownTool,
    /// Approval was required and not given
    Rejected,
}

/// One located invocation and its result line.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub tool_name: String,
    /// Split arguments (empty for unknown tools, which are never split)
    pub arguments: Vec<String>,
    pub kind: OutcomeKind,
    /// Line contributed to the tool results block
    pub text: String,
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(&self.kind, OutcomeKind::Executed(result) if result.is_success())
    }
}

/// Result of processing a full model response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedResponse {
    /// Response with every invocation removed, trimmed
    pub cleaned: String,
    pub outcomes: Vec<ToolOutcome>,
    /// Outcome lines joined with `\n`
    pub tool_results: String,
    /// What the user sees and history stores
    pub final_text: String,
}

impl ProcessedResponse {
    /// Response that contained no invocation.
    fn unchanged(response: &str) -> Self {
        Self {
            cleaned: response.to_string(),
            outcomes: Vec::new(),
            tool_results: String::new(),
            final_text: response.to_string(),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.outcomes.is_empty()
    }
}

/// Use case for executing the tool calls embedded in a model response.
pub struct DispatchToolsUseCase {
    tool_executor: Arc<dyn ToolExecutorPort>,
    approval: Arc<dyn ToolApprovalPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
    syntax: ToolCallSyntax,
    settings: AgentSettings,
}

impl Clone for DispatchToolsUseCase {
    fn clone(&self) -> Self {
        Self {
            tool_executor: self.tool_executor.clone(),
            approval: self.approval.clone(),
            conversation_logger: self.conversation_logger.clone(),
            syntax: self.syntax.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl DispatchToolsUseCase {
    pub fn new(tool_executor: Arc<dyn ToolExecutorPort>, settings: AgentSettings) -> Self {
        Self {
            tool_executor,
            approval: Arc::new(AutoApprove),
            conversation_logger: Arc::new(NoConversationLogger),
            syntax: ToolCallSyntax::new(settings.tool_marker.clone()),
            settings,
        }
    }

    pub fn with_approval(mut self, approval: Arc<dyn ToolApprovalPort>) -> Self {
        self.approval = approval;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn syntax(&self) -> &ToolCallSyntax {
        &self.syntax
    }

    pub fn tool_executor(&self) -> &Arc<dyn ToolExecutorPort> {
        &self.tool_executor
    }

    /// Locate, execute and fold the tool calls of `response`.
    pub async fn process(&self, response: &str, display: &dyn ResponseDisplay) -> ProcessedResponse {
        let invocations = self.syntax.locate(response);
        if invocations.is_empty() {
            debug!("No tool invocations in response");
            return ProcessedResponse::unchanged(response);
        }

        info!("Executing {} tool invocation(s)", invocations.len());
        display.on_tools_start(invocations.len());

        let mut outcomes = Vec::with_capacity(invocations.len());
        for invocation in &invocations {
            let outcome = match self.tool_executor.get_tool(&invocation.tool_name) {
                None => {
                    warn!(tool = %invocation.tool_name, "Unknown tool requested");
                    let text = format!("Error: Unknown tool '{}'", invocation.tool_name);
                    display.on_tool_skipped(&invocation.tool_name, &text);
                    ToolOutcome {
                        tool_name: invocation.tool_name.clone(),
                        arguments: Vec::new(),
                        kind: OutcomeKind::UnknownTool,
                        text,
                    }
                }
                Some(definition) => {
                    let call = ToolCall::from_invocation(invocation);
                    self.run_call(call, definition, display).await
                }
            };
            self.log_outcome(&outcome);
            outcomes.push(outcome);
        }

        let tool_results = outcomes
            .iter()
            .map(|o| o.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let cleaned = strip_invocations(response, &invocations);
        let final_text = format!("{}\n\n{}", cleaned, tool_results);

        ProcessedResponse {
            cleaned,
            outcomes,
            tool_results,
            final_text,
        }
    }

    async fn run_call(
        &self,
        call: ToolCall,
        definition: &ToolDefinition,
        display: &dyn ResponseDisplay,
    ) -> ToolOutcome {
        display.on_tool_call(&call.tool_name, &call.arguments);
        debug!(tool = %call.tool_name, args = call.arguments.len(), "Dispatching tool call");

        if let Err(message) = DefaultToolValidator.validate(&call, definition) {
            let result = ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message));
            display.on_tool_result(&call.tool_name, &result);
            return Self::executed(call, result);
        }

        if let Some(reason) = self.approval_reason(&call, definition) {
            let request = ApprovalRequest {
                call: &call,
                risk_level: definition.risk_level,
                reason,
            };
            let approved = match self.approval.approve(&request).await {
                Ok(approved) => approved,
                Err(e) => {
                    warn!(tool = %call.tool_name, "Approval failed: {}", e);
                    false
                }
            };
            if !approved {
                info!(tool = %call.tool_name, "Tool call not approved");
                let text = format!("Skipped {}: not approved", call.tool_name);
                display.on_tool_skipped(&call.tool_name, &text);
                return ToolOutcome {
                    tool_name: call.tool_name,
                    arguments: call.arguments,
                    kind: OutcomeKind::Rejected,
                    text,
                };
            }
        }

        let result = self.tool_executor.execute(&call).await;
        if !result.is_success() {
            warn!(tool = %call.tool_name, "Tool failed: {}", result.render());
        }
        display.on_tool_result(&call.tool_name, &result);
        Self::executed(call, result)
    }

    fn executed(call: ToolCall, result: ToolResult) -> ToolOutcome {
        ToolOutcome {
            text: result.render(),
            tool_name: call.tool_name,
            arguments: call.arguments,
            kind: OutcomeKind::Executed(result),
        }
    }

    fn approval_reason(&self, call: &ToolCall, definition: &ToolDefinition) -> Option<ApprovalReason> {
        if call.tool_name == COMMAND_TOOL
            && let Some(prefix) = call
                .arg(0)
                .and_then(|command| self.settings.dangerous_prefix(command))
        {
            return Some(ApprovalReason::DangerousCommand(prefix.to_string()));
        }

        if definition.is_high_risk() && !self.settings.auto_execute_tools {
            return Some(ApprovalReason::HighRisk);
        }

        None
    }

    fn log_outcome(&self, outcome: &ToolOutcome) {
        let status = match &outcome.kind {
            OutcomeKind::Executed(result) if result.is_success() => "success",
            OutcomeKind::Executed(_) => "failure",
            OutcomeKind::UnknownTool => "unknown_tool",
            OutcomeKind::Rejected => "rejected",
        };
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call",
            serde_json::json!({
                "tool": outcome.tool_name,
                "args": outcome.arguments,
                "status": status,
                "result": truncate_bytes(&outcome.text, 2000),
            }),
        ));
    }
}
