//! Ollama LLM Gateway implementation

use super::error::OllamaError;
use super::protocol::{
    ErrorBody, GenerateBody, NdjsonDecoder, TagsResponse, events_for_line,
};
use async_trait::async_trait;
use codeagent_application::ports::llm_gateway::{
    GatewayError, GenerateRequest, LlmGateway, ModelInfo, StreamHandle,
};
use codeagent_domain::StreamEvent;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Default Ollama endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default connect/read timeout for generation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for the model listing, which doubles as the health check
pub const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

/// LLM Gateway implementation for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaGateway {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaGateway {
    /// Create a gateway for `base_url`.
    ///
    /// `timeout` bounds connecting and each read; a long generation that keeps
    /// producing tokens is never cut off.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, OllamaError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;

        let base_url = normalize_base_url(base_url);
        info!("OllamaGateway initialized for {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn error_from_status(response: reqwest::Response, model: &str) -> OllamaError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        if status == 404 {
            OllamaError::ModelNotFound(model.to_string())
        } else {
            OllamaError::Status { status, message }
        }
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    async fn generate_streaming(
        &self,
        request: &GenerateRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateBody {
            model: request.model.as_str(),
            prompt: &request.prompt,
            stream: true,
            options: &request.options,
        };
        debug!(
            model = %request.model,
            prompt_bytes = request.prompt.len(),
            "POST {}",
            url
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| OllamaError::from_request(&self.base_url, e))?;

        if !response.status().is_success() {
            return Err(Self::error_from_status(response, request.model.as_str()).await.into());
        }

        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(pump(response, tx));
        Ok(StreamHandle::new(rx))
    }

    async fn available_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        let url = format!("{}/api/tags", self.base_url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .map_err(|e| OllamaError::from_request(&self.base_url, e))?;

        if !response.status().is_success() {
            return Err(Self::error_from_status(response, "").await.into());
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        info!("Ollama reports {} installed models", tags.models.len());
        Ok(tags.models)
    }
}

/// Forward the NDJSON body to the stream channel.
async fn pump(response: reqwest::Response, tx: mpsc::Sender<StreamEvent>) {
    let mut decoder = NdjsonDecoder::new();
    let mut full = String::new();
    let mut body = response.bytes_stream();

    while let Some(item) = body.next().await {
        let bytes = match item {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Generation stream failed: {}", e);
                let message = if e.is_timeout() {
                    "Request timed out. The model might be too slow.".to_string()
                } else {
                    e.to_string()
                };
                let _ = tx.send(StreamEvent::Error(message)).await;
                return;
            }
        };

        for line in decoder.push(&bytes) {
            if forward(&line, &mut full, &tx).await {
                return;
            }
        }
    }

    if let Some(line) = decoder.finish()
        && forward(&line, &mut full, &tx).await
    {
        return;
    }

    // Body ended without a done marker
    let _ = tx.send(StreamEvent::Completed(full)).await;
}

/// Send the events for one line. Returns true once the stream is over.
async fn forward(line: &str, full: &mut String, tx: &mpsc::Sender<StreamEvent>) -> bool {
    let (events, finished) = events_for_line(line, full);
    for event in events {
        if tx.send(event).await.is_err() {
            // Receiver dropped
            return true;
        }
    }
    finished
}

/// Trim whitespace and trailing slashes; assume `http://` when no scheme.
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeagent_domain::{Model, ModelOptions};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/x-ndjson\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });

        (base, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let lower = l.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    return text;
                }
            }
            if n == 0 {
                return text;
            }
        }
    }

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest::new(Model::new("llama3:8b").unwrap(), prompt)
            .with_options(ModelOptions::agent_defaults())
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://localhost:11434/"), "http://localhost:11434");
        assert_eq!(normalize_base_url("  http://gpu-box:11434//  "), "http://gpu-box:11434");
        assert_eq!(normalize_base_url("gpu-box:11434"), "http://gpu-box:11434");
        assert_eq!(normalize_base_url("https://ollama.example.com"), "https://ollama.example.com");
        assert_eq!(normalize_base_url(""), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_generate_streams_deltas() {
        let (base, server) = serve_once(
            "200 OK",
            "{\"response\":\"Hel\",\"done\":false}\n{\"response\":\"lo\",\"done\":false}\n{\"response\":\"\",\"done\":true}\n",
        )
        .await;
        let gateway = OllamaGateway::new(&base, DEFAULT_TIMEOUT).unwrap();

        let handle = gateway.generate_streaming(&request("say hello")).await.unwrap();
        let mut seen = Vec::new();
        let text = handle.consume(|t| seen.push(t.to_string())).await.unwrap();

        assert_eq!(text, "Hello");
        assert_eq!(seen, vec!["Hel", "lo"]);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/generate"));
        let body: serde_json::Value =
            serde_json::from_str(&raw[raw.find("\r\n\r\n").unwrap() + 4..]).unwrap();
        assert_eq!(body["model"], "llama3:8b");
        assert_eq!(body["prompt"], "say hello");
        assert_eq!(body["stream"], true);
        assert_eq!(body["options"]["num_predict"], 2048);
    }

    #[tokio::test]
    async fn test_generate_stream_error_line() {
        let (base, _server) = serve_once(
            "200 OK",
            "{\"response\":\"par\",\"done\":false}\n{\"error\":\"out of memory\"}\n",
        )
        .await;
        let gateway = OllamaGateway::new(&base, DEFAULT_TIMEOUT).unwrap();

        let handle = gateway.generate_streaming(&request("x")).await.unwrap();
        let err = handle.collect_text().await.unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(msg) if msg == "out of memory"));
    }

    #[tokio::test]
    async fn test_generate_missing_model() {
        let (base, _server) =
            serve_once("404 Not Found", "{\"error\":\"model 'llama3:8b' not found\"}").await;
        let gateway = OllamaGateway::new(&base, DEFAULT_TIMEOUT).unwrap();

        let err = gateway.generate_streaming(&request("x")).await.unwrap_err();
        assert!(matches!(err, GatewayError::ModelNotAvailable(m) if m == "llama3:8b"));
    }

    #[tokio::test]
    async fn test_generate_server_error() {
        let (base, _server) =
            serve_once("500 Internal Server Error", "{\"error\":\"boom\"}").await;
        let gateway = OllamaGateway::new(&base, DEFAULT_TIMEOUT).unwrap();

        let err = gateway.generate_streaming(&request("x")).await.unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(msg) if msg.contains("500") && msg.contains("boom")));
    }

    #[tokio::test]
    async fn test_available_models() {
        let (base, server) = serve_once(
            "200 OK",
            "{\"models\":[{\"name\":\"llama3:8b\",\"size\":4661224676},{\"name\":\"qwen2.5-coder:7b\",\"size\":4683087332}]}",
        )
        .await;
        let gateway = OllamaGateway::new(&format!("{}/", base), DEFAULT_TIMEOUT).unwrap();

        let models = gateway.available_models().await.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[1].name, "qwen2.5-coder:7b");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/tags"));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let gateway = OllamaGateway::new(&base, DEFAULT_TIMEOUT).unwrap();
        let err = gateway.available_models().await.unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }
}
