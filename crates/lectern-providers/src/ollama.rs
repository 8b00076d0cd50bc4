//! Ollama provider for locally served models.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lectern_core::traits::{GenerateRequest, GenerateResponse, LlmProvider, TokenUsage};

use crate::error::ProviderError;
use crate::http::{elapsed_ms, http_client, raw_body, read_json, send_error, ChatMessage};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
// Local models on CPU can take minutes per stage.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Client for Ollama's `/api/chat`.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            client: http_client(DEFAULT_TIMEOUT_SECS)?,
        })
    }

    /// Point at `ollama serve` when nothing listens on the port.
    fn send_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_connect() {
            ProviderError::NetworkError(format!(
                "Ollama not reachable at {}. Is it running? Start with: ollama serve",
                self.base_url
            ))
        } else {
            send_error(err, DEFAULT_TIMEOUT_SECS)
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    options: SamplingOptions,
}

#[derive(Serialize)]
struct SamplingOptions {
    temperature: f64,
    num_predict: u32,
}

impl<'a> ChatRequest<'a> {
    fn from_request(request: &'a GenerateRequest) -> Self {
        Self {
            model: &request.model,
            messages: [ChatMessage::system(request), ChatMessage::user(request)],
            stream: false,
            options: SamplingOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }
}

#[derive(Deserialize)]
struct ChatReply {
    message: ReplyMessage,
    model: String,
    #[serde(default)]
    prompt_eval_count: u32,
    #[serde(default)]
    eval_count: u32,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&ChatRequest::from_request(request))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let reply: ChatReply = read_json(response, &request.model, raw_body)
            .await
            .map_err(|e| match e {
                ProviderError::ModelNotFound(model) => ProviderError::ModelNotFound(format!(
                    "Model '{model}' not found locally. Pull it with: ollama pull {model}"
                )),
                other => other,
            })?;

        Ok(GenerateResponse {
            content: reply.message.content,
            model: reply.model,
            token_usage: TokenUsage::new(reply.prompt_eval_count, reply.eval_count),
            latency_ms: elapsed_ms(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(model: &str) -> GenerateRequest {
        GenerateRequest {
            model: model.into(),
            prompt: "List the key concepts of graph traversal".into(),
            system_prompt: None,
            max_tokens: 512,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn successful_generation() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "message": {"role": "assistant", "content": "- Breadth-first search\n- Depth-first search"},
            "model": "llama3.1:8b",
            "prompt_eval_count": 30,
            "eval_count": 15
        });

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "stream": false,
                "options": {"num_predict": 512}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri()).unwrap();
        let response = provider.generate(&request("llama3.1:8b")).await.unwrap();
        assert!(response.content.contains("Breadth-first"));
        assert_eq!(response.token_usage.prompt_tokens, 30);
        assert_eq!(response.token_usage.total_tokens, 45);
    }

    #[tokio::test]
    async fn model_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri()).unwrap();
        let err = provider.generate(&request("nonexistent")).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("ollama pull nonexistent"));
    }

    #[tokio::test]
    async fn unreachable_server_suggests_ollama_serve() {
        // Port 9 (discard) is closed on test machines.
        let provider = OllamaProvider::new("http://127.0.0.1:9/").unwrap();
        let err = provider.generate(&request("llama3.1:8b")).await.unwrap_err();
        assert!(err.to_string().contains("ollama serve"), "{err}");
        assert!(err.downcast_ref::<ProviderError>().unwrap().is_retryable());
    }

    #[test]
    fn empty_base_url_uses_default() {
        let provider = OllamaProvider::new("").unwrap();
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }
}
