//! The closed set of builtin tools.
//!
//! Dispatch goes through [`BuiltinTool`] rather than a name-keyed table of
//! closures, so adding a tool means adding a variant and the compiler points
//! at every `match` that needs a new arm.

use super::{command, directory, file, search, todo};
use codeagent_domain::ToolDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTool {
    ReadFile,
    WriteFile,
    EditFile,
    RunCommand,
    ListFiles,
    SearchFiles,
    CreateDirectory,
    AddTodo,
    UpdateTodo,
    ShowTodos,
}

impl BuiltinTool {
    /// Every builtin, in the order shown to the model
    pub const ALL: [BuiltinTool; 10] = [
        BuiltinTool::ReadFile,
        BuiltinTool::WriteFile,
        BuiltinTool::EditFile,
        BuiltinTool::RunCommand,
        BuiltinTool::ListFiles,
        BuiltinTool::SearchFiles,
        BuiltinTool::CreateDirectory,
        BuiltinTool::AddTodo,
        BuiltinTool::UpdateTodo,
        BuiltinTool::ShowTodos,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinTool::ReadFile => file::READ_FILE,
            BuiltinTool::WriteFile => file::WRITE_FILE,
            BuiltinTool::EditFile => file::EDIT_FILE,
            BuiltinTool::RunCommand => command::RUN_COMMAND,
            BuiltinTool::ListFiles => directory::LIST_FILES,
            BuiltinTool::SearchFiles => search::SEARCH_FILES,
            BuiltinTool::CreateDirectory => directory::CREATE_DIRECTORY,
            BuiltinTool::AddTodo => todo::ADD_TODO,
            BuiltinTool::UpdateTodo => todo::UPDATE_TODO,
            BuiltinTool::ShowTodos => todo::SHOW_TODOS,
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn definition(self) -> ToolDefinition {
        match self {
            BuiltinTool::ReadFile => file::read_file_definition(),
            BuiltinTool::WriteFile => file::write_file_definition(),
            BuiltinTool::EditFile => file::edit_file_definition(),
            BuiltinTool::RunCommand => command::run_command_definition(),
            BuiltinTool::ListFiles => directory::list_files_definition(),
            BuiltinTool::SearchFiles => search::search_files_definition(),
            BuiltinTool::CreateDirectory => directory::create_directory_definition(),
            BuiltinTool::AddTodo => todo::add_todo_definition(),
            BuiltinTool::UpdateTodo => todo::update_todo_definition(),
            BuiltinTool::ShowTodos => todo::show_todos_definition(),
        }
    }
}

impl std::fmt::Display for BuiltinTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeagent_domain::RiskLevel;

    #[test]
    fn test_name_round_trip() {
        for tool in BuiltinTool::ALL {
            assert_eq!(BuiltinTool::from_name(tool.name()), Some(tool));
            assert_eq!(tool.definition().name, tool.name());
        }
    }

    #[test]
    fn test_from_name_is_exact() {
        assert_eq!(BuiltinTool::from_name("READ_FILE"), None);
        assert_eq!(BuiltinTool::from_name("read_file "), None);
        assert_eq!(BuiltinTool::from_name("delete_everything"), None);
    }

    #[test]
    fn test_risk_levels() {
        let high: Vec<_> = BuiltinTool::ALL
            .into_iter()
            .filter(|t| t.definition().risk_level == RiskLevel::High)
            .collect();
        assert_eq!(
            high,
            vec![
                BuiltinTool::WriteFile,
                BuiltinTool::EditFile,
                BuiltinTool::RunCommand,
                BuiltinTool::CreateDirectory,
            ]
        );
    }
}
