//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
///
/// Checks that every required positional parameter has an argument.
/// Extra trailing arguments are tolerated; models often add a stray one.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for (index, param) in definition.parameters.iter().enumerate() {
            if param.required && call.arg(index).is_none() {
                return Err(format!(
                    "Missing required argument '{}' for tool '{}' (expected {}({}))",
                    param.name,
                    definition.name,
                    definition.name,
                    definition.usage_arguments()
                ));
            }
        }

        Ok(())
    }
}
