//! Prompt templates for the coding agent

use crate::session::entities::Message;
use crate::tool::entities::ToolSpec;
use crate::tool::invocation::ToolCallSyntax;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt teaching the model the tools and the invocation syntax.
    ///
    /// `now` is the already formatted current time.
    pub fn system_prompt(
        tool_spec: &ToolSpec,
        syntax: &ToolCallSyntax,
        working_dir: &str,
        now: &str,
    ) -> String {
        let tool_descriptions = tool_spec
            .all()
            .map(|t| {
                format!(
                    "- {}: {} Usage: {}",
                    t.name,
                    t.description,
                    syntax.render(&t.name, &t.usage_arguments())
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let example = |name: &str, args: &str| format!("- {}", syntax.render(name, args));
        let examples = [
            example("read_file", "main.py"),
            example("run_command", "ls -la"),
            example("write_file", r#""test.py", "print('hello world')""#),
            example(
                "write_file",
                r#""app.js", "function greet() {\n  console.log('Hi');\n}""#,
            ),
            example("edit_file", r#""config.py", "DEBUG = False", "DEBUG = True""#),
            example("list_files", "."),
            example("create_directory", "src/components"),
            example("add_todo", r#""Write unit tests for the parser""#),
            example("update_todo", "1, completed"),
        ]
        .join("\n");

        format!(
            r#"You are an expert AI coding assistant running locally. You help with coding, debugging, and file operations.

You have access to these tools:
{tool_descriptions}

To use a tool, format it exactly as: {syntax_line}

IMPORTANT FORMATTING RULES:
- Put each tool call on its own line
- For write_file and edit_file, wrap every argument in double quotes
- Escape double quotes inside content as \" and write newlines as \n
- Commas and parentheses inside quoted arguments are fine

Examples:
{examples}

Current directory: {working_dir}
Current time: {now}

Guidelines:
1. Always explain what you're doing before using tools
2. For file operations, show the relevant code/content
3. Ask for confirmation before destructive operations
4. Provide clear, concise explanations
5. Use markdown formatting for better readability
6. For multi-step work, track progress with the todo tools
"#,
            tool_descriptions = tool_descriptions,
            syntax_line = syntax.render("tool_name", "arg1, arg2, ..."),
            examples = examples,
            working_dir = working_dir,
            now = now,
        )
    }

    /// Full prompt for one turn: system text, recent history, then the new
    /// user input, ending where the model should continue.
    pub fn conversation_prompt(system: &str, history: &[Message], user_input: &str) -> String {
        let mut prompt = String::with_capacity(system.len() + user_input.len() + 256);
        prompt.push_str(system);
        prompt.push_str("\n\n");

        for message in history {
            prompt.push_str(&format!("{}: {}\n\n", message.role, message.content));
        }

        prompt.push_str(&format!("user: {}\n\nassistant: ", user_input));
        prompt
    }
}
