//! Chat Session use case.
//!
//! [`ChatSession`] is the single object that owns everything one
//! conversation needs: the model, its sampling options, the message history
//! and (through the tool executor) the working directory. One call to
//! [`ChatSession::send`] is one turn:
//!
//! 1. Render the prompt from the system text, the last `history_window`
//!    messages and the new input
//! 2. Stream the generation, forwarding tokens to the display
//! 3. Hand the complete text to [`DispatchToolsUseCase`]
//! 4. Record the user input and the final text in history
//!
//! History is only updated after a successful generation, so a failed turn
//! can simply be retried.

use crate::config::AgentSettings;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, GenerateRequest, LlmGateway};
use crate::ports::response_display::ResponseDisplay;
use crate::use_cases::dispatch_tools::{DispatchToolsUseCase, ProcessedResponse};
use codeagent_domain::{
    AgentPromptTemplate, ConversationHistory, Message, Model, ModelOptions, TodoList, ToolSpec,
    truncate_chars,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during a chat turn.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Outcome of one turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Text exactly as generated
    pub raw_response: String,
    /// Tool dispatch result (cleaned text, outcomes, final text)
    pub processed: ProcessedResponse,
}

impl ChatTurn {
    /// What the user sees and what history stores.
    pub fn final_text(&self) -> &str {
        &self.processed.final_text
    }
}

/// One conversation with the local model.
pub struct ChatSession {
    gateway: Arc<dyn LlmGateway>,
    dispatch: DispatchToolsUseCase,
    conversation_logger: Arc<dyn ConversationLogger>,
    settings: AgentSettings,
    model: Model,
    options: ModelOptions,
    history: ConversationHistory,
}

impl ChatSession {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        dispatch: DispatchToolsUseCase,
        model: Model,
        settings: AgentSettings,
    ) -> Self {
        Self {
            gateway,
            dispatch,
            conversation_logger: Arc::new(NoConversationLogger),
            settings,
            model,
            options: ModelOptions::agent_defaults(),
            history: ConversationHistory::new(),
        }
    }

    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Switch model. History is kept.
    pub fn set_model(&mut self, model: Model, options: ModelOptions) {
        info!("Switching model {} -> {}", self.model, model);
        self.model = model;
        self.options = options;
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn tool_spec(&self) -> &ToolSpec {
        self.dispatch.tool_executor().tool_spec()
    }

    pub fn working_dir(&self) -> PathBuf {
        self.dispatch.tool_executor().working_dir()
    }

    /// Snapshot of the todo list the model maintains.
    pub fn todos(&self) -> TodoList {
        self.dispatch.tool_executor().todos()
    }

    /// Point relative tool paths at `dir`. The caller checks it exists.
    pub fn set_working_dir(&self, dir: &Path) {
        info!("Working directory: {}", dir.display());
        self.dispatch.tool_executor().set_working_dir(dir);
    }

    /// System prompt for the current tools, directory and time.
    pub fn system_prompt(&self) -> String {
        AgentPromptTemplate::system_prompt(
            self.tool_spec(),
            self.dispatch.syntax(),
            &self.working_dir().display().to_string(),
            &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        )
    }

    /// Run one turn.
    pub async fn send(
        &mut self,
        user_input: &str,
        display: &dyn ResponseDisplay,
    ) -> Result<ChatTurn, ChatError> {
        info!("Chat turn with {}: {}", self.model, truncate_chars(user_input, 80));

        let prompt = AgentPromptTemplate::conversation_prompt(
            &self.system_prompt(),
            self.history.recent(self.settings.history_window),
            user_input,
        );
        self.conversation_logger.log(ConversationEvent::new(
            "user_input",
            serde_json::json!({
                "model": self.model.as_str(),
                "input": user_input,
                "prompt_bytes": prompt.len(),
            }),
        ));

        let request = GenerateRequest::new(self.model.clone(), prompt).with_options(self.options.clone());

        display.on_stream_start();
        let generated = self.generate(&request, display).await;
        display.on_stream_end();

        let raw_response = match generated {
            Ok(text) => text,
            Err(e) => {
                warn!("Generation failed: {}", e);
                return Err(e);
            }
        };
        self.conversation_logger.log(ConversationEvent::new(
            "llm_response",
            serde_json::json!({
                "model": self.model.as_str(),
                "bytes": raw_response.len(),
                "text": raw_response,
            }),
        ));

        let processed = self.dispatch.process(&raw_response, display).await;

        self.history.push(Message::user(user_input));
        self.history.push(Message::assistant(processed.final_text.clone()));

        Ok(ChatTurn {
            raw_response,
            processed,
        })
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
        display: &dyn ResponseDisplay,
    ) -> Result<String, ChatError> {
        let stream = async {
            let handle = self.gateway.generate_streaming(request).await?;
            let text = handle.consume(|token| display.on_token(token)).await?;
            Ok::<_, ChatError>(text)
        };

        match self.settings.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, stream)
                .await
                .map_err(|_| ChatError::Timeout(limit))?,
            None => stream.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{ModelInfo, StreamHandle};
    use crate::ports::response_display::NoDisplay;
    use crate::ports::tool_executor::ToolExecutorPort;
    use async_trait::async_trait;
    use codeagent_domain::{
        RiskLevel, StreamEvent, ToolCall, ToolDefinition, ToolParameter, ToolResult,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    // ==================== Test Mocks ====================

    /// Replays scripted streams and records every request.
    struct MockGateway {
        streams: Mutex<VecDeque<Vec<StreamEvent>>>,
        requests: Mutex<Vec<GenerateRequest>>,
        /// Senders kept alive so a stream can be left hanging
        open: Mutex<Vec<mpsc::Sender<StreamEvent>>>,
    }

    impl MockGateway {
        fn new(streams: Vec<Vec<StreamEvent>>) -> Self {
            Self {
                streams: Mutex::new(VecDeque::from(streams)),
                requests: Mutex::new(Vec::new()),
                open: Mutex::new(Vec::new()),
            }
        }

        fn text(chunks: &[&str]) -> Vec<StreamEvent> {
            let mut events: Vec<StreamEvent> = chunks
                .iter()
                .map(|c| StreamEvent::Delta(c.to_string()))
                .collect();
            events.push(StreamEvent::Completed(chunks.concat()));
            events
        }

        fn requests(&self) -> Vec<GenerateRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn generate_streaming(
            &self,
            request: &GenerateRequest,
        ) -> Result<StreamHandle, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            let events = self
                .streams
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| GatewayError::ConnectionError("connection refused".to_string()))?;

            let (tx, rx) = mpsc::channel(events.len() + 1);
            let terminal = events.last().is_some_and(StreamEvent::is_terminal);
            for event in events {
                tx.try_send(event).unwrap();
            }
            if !terminal {
                self.open.lock().unwrap().push(tx);
            }
            Ok(StreamHandle::new(rx))
        }

        async fn available_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
            Ok(vec![ModelInfo::new("llama3:8b", 0)])
        }
    }

    struct EchoExecutor {
        spec: ToolSpec,
        dir: Mutex<PathBuf>,
    }

    impl EchoExecutor {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new().register(
                    ToolDefinition::new("read_file", "Read a file", RiskLevel::Low)
                        .with_parameter(ToolParameter::new("path", "File", true)),
                ),
                dir: Mutex::new(PathBuf::from("/work")),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for EchoExecutor {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        fn working_dir(&self) -> PathBuf {
            self.dir.lock().unwrap().clone()
        }

        fn set_working_dir(&self, dir: &Path) {
            *self.dir.lock().unwrap() = dir.to_path_buf();
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            ToolResult::success(&call.tool_name, format!("contents of {}", call.arguments[0]))
        }
    }

    #[derive(Default)]
    struct TokenDisplay {
        tokens: Mutex<Vec<String>>,
        lifecycle: Mutex<Vec<&'static str>>,
    }

    impl ResponseDisplay for TokenDisplay {
        fn on_stream_start(&self) {
            self.lifecycle.lock().unwrap().push("start");
        }
        fn on_token(&self, token: &str) {
            self.tokens.lock().unwrap().push(token.to_string());
        }
        fn on_stream_end(&self) {
            self.lifecycle.lock().unwrap().push("end");
        }
    }

    fn session(gateway: Arc<MockGateway>, settings: AgentSettings) -> ChatSession {
        let dispatch = DispatchToolsUseCase::new(Arc::new(EchoExecutor::new()), settings.clone());
        ChatSession::new(gateway, dispatch, Model::new("llama3:8b").unwrap(), settings)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_send_streams_and_records_history() {
        let gateway = Arc::new(MockGateway::new(vec![MockGateway::text(&["Hel", "lo!"])]));
        let mut chat = session(gateway.clone(), AgentSettings::default());
        let display = TokenDisplay::default();

        let turn = chat.send("hi", &display).await.unwrap();

        assert_eq!(turn.final_text(), "Hello!");
        assert_eq!(*display.tokens.lock().unwrap(), vec!["Hel", "lo!"]);
        assert_eq!(*display.lifecycle.lock().unwrap(), vec!["start", "end"]);
        assert_eq!(
            chat.history().messages(),
            &[Message::user("hi"), Message::assistant("Hello!")]
        );

        let request = &gateway.requests()[0];
        assert_eq!(request.model.as_str(), "llama3:8b");
        assert_eq!(request.options.temperature, Some(0.7));
        assert!(request.prompt.ends_with("user: hi\n\nassistant: "));
        assert!(request.prompt.contains("Current directory: /work"));
    }

    #[tokio::test]
    async fn test_prompt_uses_history_window() {
        let gateway = Arc::new(MockGateway::new(vec![
            MockGateway::text(&["one"]),
            MockGateway::text(&["two"]),
            MockGateway::text(&["three"]),
        ]));
        let mut chat = session(gateway.clone(), AgentSettings::default().with_history_window(2));

        chat.send("first", &NoDisplay).await.unwrap();
        chat.send("second", &NoDisplay).await.unwrap();
        chat.send("third", &NoDisplay).await.unwrap();

        let prompt = &gateway.requests()[2].prompt;
        assert!(!prompt.contains("user: first"));
        assert!(prompt.contains("user: second\n\nassistant: two\n\nuser: third\n\nassistant: "));
        assert_eq!(chat.history().len(), 6);
    }

    #[tokio::test]
    async fn test_tool_calls_are_dispatched() {
        let gateway = Arc::new(MockGateway::new(vec![MockGateway::text(&[
            "Reading.\n",
            "TOOL[read_file](main.py)",
        ])]));
        let mut chat = session(gateway, AgentSettings::default());

        let turn = chat.send("show main.py", &NoDisplay).await.unwrap();

        assert_eq!(turn.raw_response, "Reading.\nTOOL[read_file](main.py)");
        assert_eq!(turn.final_text(), "Reading.\n\ncontents of main.py");
        assert_eq!(
            chat.history().messages()[1].content,
            "Reading.\n\ncontents of main.py"
        );
    }

    #[tokio::test]
    async fn test_gateway_error_leaves_history_untouched() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let mut chat = session(gateway, AgentSettings::default());
        let display = TokenDisplay::default();

        let err = chat.send("hi", &display).await.unwrap_err();

        assert!(matches!(err, ChatError::Gateway(GatewayError::ConnectionError(_))));
        assert!(chat.history().is_empty());
        assert_eq!(*display.lifecycle.lock().unwrap(), vec!["start", "end"]);
    }

    #[tokio::test]
    async fn test_stream_error_event() {
        let gateway = Arc::new(MockGateway::new(vec![vec![
            StreamEvent::Delta("par".into()),
            StreamEvent::Error("model crashed".into()),
        ]]));
        let mut chat = session(gateway, AgentSettings::default());

        let err = chat.send("hi", &NoDisplay).await.unwrap_err();
        assert!(err.to_string().contains("model crashed"));
    }

    #[tokio::test]
    async fn test_empty_response_is_allowed() {
        let gateway = Arc::new(MockGateway::new(vec![vec![StreamEvent::Completed(String::new())]]));
        let mut chat = session(gateway, AgentSettings::default());

        let turn = chat.send("hi", &NoDisplay).await.unwrap();
        assert_eq!(turn.final_text(), "");
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn test_generation_timeout() {
        let gateway = Arc::new(MockGateway::new(vec![vec![StreamEvent::Delta("slow".into())]]));
        let settings =
            AgentSettings::default().with_generation_timeout(Some(Duration::from_millis(50)));
        let mut chat = session(gateway, settings);

        let err = chat.send("hi", &NoDisplay).await.unwrap_err();
        assert!(matches!(err, ChatError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_set_model_and_clear() {
        let gateway = Arc::new(MockGateway::new(vec![
            MockGateway::text(&["a"]),
            MockGateway::text(&["b"]),
        ]));
        let mut chat = session(gateway.clone(), AgentSettings::default());

        chat.send("x", &NoDisplay).await.unwrap();
        chat.set_model(
            Model::new("qwen2.5-coder:7b").unwrap(),
            ModelOptions::default().with_temperature(0.2),
        );
        chat.clear_history();
        chat.send("y", &NoDisplay).await.unwrap();

        let second = &gateway.requests()[1];
        assert_eq!(second.model.as_str(), "qwen2.5-coder:7b");
        assert_eq!(second.options.temperature, Some(0.2));
        assert!(!second.prompt.contains("user: x"));
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn test_set_working_dir_updates_prompt() {
        let gateway = Arc::new(MockGateway::new(vec![MockGateway::text(&["ok"])]));
        let mut chat = session(gateway.clone(), AgentSettings::default());

        chat.set_working_dir(Path::new("/elsewhere"));
        chat.send("x", &NoDisplay).await.unwrap();

        assert_eq!(chat.working_dir(), PathBuf::from("/elsewhere"));
        assert!(gateway.requests()[0].prompt.contains("Current directory: /elsewhere"));
    }
}
