//! Tool approval port.
//!
//! Asked before a tool call runs when it needs the user's consent:
//!
//! - any High-risk tool while automatic tool execution is disabled
//! - a `run_command` whose command matches a configured dangerous prefix,
//!   regardless of the automatic execution setting
//!
//! # Built-in Implementations
//!
//! - [`AutoApprove`] - Always approves (`--yes`, one-shot scripts)
//! - [`AutoReject`] - Always rejects
//!
//! For interactive use, see `ConsoleApproval` in the presentation layer.

use async_trait::async_trait;
use codeagent_domain::{RiskLevel, ToolCall};

/// Why approval is being requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalReason {
    /// High-risk tool while auto-execution is off
    HighRisk,
    /// Shell command matched a dangerous prefix (the matched prefix)
    DangerousCommand(String),
}

impl std::fmt::Display for ApprovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalReason::HighRisk => write!(f, "modifies files or runs commands"),
            ApprovalReason::DangerousCommand(prefix) => {
                write!(f, "command starts with dangerous '{}'", prefix)
            }
        }
    }
}

/// A pending approval question
#[derive(Debug, Clone)]
pub struct ApprovalRequest<'a> {
    pub call: &'a ToolCall,
    pub risk_level: RiskLevel,
    pub reason: ApprovalReason,
}

/// Error type for approval prompts.
///
/// Failures here are treated as a rejection by the dispatcher.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApprovalError {
    #[error("Approval cancelled")]
    Cancelled,
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Port for asking whether a tool call may run.
#[async_trait]
pub trait ToolApprovalPort: Send + Sync {
    async fn approve(&self, request: &ApprovalRequest<'_>) -> Result<bool, ApprovalError>;
}

/// Approves everything.
pub struct AutoApprove;

#[async_trait]
impl ToolApprovalPort for AutoApprove {
    async fn approve(&self, _request: &ApprovalRequest<'_>) -> Result<bool, ApprovalError> {
        Ok(true)
    }
}

/// Rejects everything.
pub struct AutoReject;

#[async_trait]
impl ToolApprovalPort for AutoReject {
    async fn approve(&self, _request: &ApprovalRequest<'_>) -> Result<bool, ApprovalError> {
        Ok(false)
    }
}
