//! Tool domain entities

use super::invocation::Invocation;
use super::arguments::split_arguments;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Risk level of a tool operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk - read-only or bookkeeping operations (e.g., read_file, add_todo)
    Low,
    /// High risk - operations that modify the filesystem or run commands
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }

    /// Whether the user may be asked before this kind of tool runs.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool the model may invoke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "read_file")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Risk level of this tool
    pub risk_level: RiskLevel,
    /// Positional parameters, in call order
    pub parameters: Vec<ToolParameter>,
}

/// A positional parameter of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name, shown in usage lines
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Whether the argument is usually quoted (free text rather than a word)
    pub quoted: bool,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            risk_level,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk_level.requires_confirmation()
    }

    /// Number of required leading parameters.
    pub fn required_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.required).count()
    }

    /// Argument list as it should appear in a usage line,
    /// e.g. `"path", "content"` or `number, status`.
    pub fn usage_arguments(&self) -> String {
        self.parameters
            .iter()
            .map(|p| {
                let name = if p.quoted {
                    format!("\"{}\"", p.name)
                } else {
                    p.name.clone()
                };
                if p.required { name } else { format!("[{}]", name) }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            quoted: false,
        }
    }

    pub fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }
}

/// Ordered set of tools available to the model
///
/// Registration order is preserved so the system prompt lists tools the same
/// way every time.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool (builder pattern). Re-registering a name replaces the
    /// previous definition in place.
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        match self.index.get(&tool.name) {
            Some(&i) => self.tools[i] = tool,
            None => {
                self.index.insert(tool.name.clone(), self.tools.len());
                self.tools.push(tool);
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn high_risk_tools(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().filter(|t| t.is_high_risk())
    }
}

/// A call to a tool with positional arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Positional arguments, already split and unquoted
    pub arguments: Vec<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: Vec::new(),
        }
    }

    /// Build a call from a located invocation by splitting its arguments.
    pub fn from_invocation(invocation: &Invocation) -> Self {
        Self {
            tool_name: invocation.tool_name.clone(),
            arguments: split_arguments(&invocation.raw_arguments),
        }
    }

    pub fn with_arg(mut self, value: impl Into<String>) -> Self {
        self.arguments.push(value.into());
        self
    }

    /// Get a positional argument
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(|s| s.as_str())
    }

    /// Get a required positional argument or return an error message
    pub fn require(&self, index: usize, name: &str) -> Result<&str, String> {
        self.arg(index)
            .ok_or_else(|| format!("Missing required argument: {}", name))
    }

    /// Get a positional argument, or `default` when absent or empty
    pub fn arg_or<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        match self.arg(index) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }
}
