//! OpenAI-compatible upstream

use livecraft_types::{ChatMessage, ChatRequest};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_UPSTREAM_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_UPSTREAM_MODEL: &str = "google/gemini-2.0-flash-001";

pub const SYSTEM_PROMPT: &str = r#"You are an expert full-stack developer AI assistant. When the user asks you to build something, you MUST respond with working code.

IMPORTANT RULES:
1. Always respond with complete, working code files.
2. Use the following format to specify files:

---FILE: path/to/file.ext---
(file content here)
---END FILE---

3. You can create multiple files in one response.
4. Use React with TypeScript and Tailwind CSS.
5. Make the code functional, clean and well-structured.
6. If the user asks a question (not to build), respond normally without file blocks.
7. Always include ALL necessary imports and exports.
8. Keep code concise but complete."#;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Upstream API key not configured")]
    MissingApiKey,

    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream error: {status} - {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub default_model: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPSTREAM_URL.to_string(),
            api_key: None,
            default_model: DEFAULT_UPSTREAM_MODEL.to_string(),
        }
    }
}

/// Body sent upstream
#[derive(Debug, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

pub struct UpstreamClient {
    http: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// System prompt first, then the transcript; the request's model wins
    /// over the configured default.
    pub fn completion_request(&self, request: &ChatRequest) -> CompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage::new("system", SYSTEM_PROMPT));
        messages.extend(request.messages.iter().cloned());

        CompletionRequest {
            model: request
                .model
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| self.config.default_model.clone()),
            messages,
            stream: true,
        }
    }

    /// Open a streaming completion. Non-success statuses become
    /// `UpstreamError::Status` carrying the upstream body.
    pub async fn open(&self, request: &ChatRequest) -> Result<reqwest::Response, UpstreamError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingApiKey)?;

        let body = self.completion_request(request);
        tracing::info!(
            model = %body.model,
            messages = body.messages.len(),
            "Forwarding chat request"
        );

        let response = self
            .http
            .post(&self.config.url)
            .bearer_auth(api_key)
            .header("X-Title", "Livecraft")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livecraft_types::Message;

    fn client(model: &str) -> UpstreamClient {
        UpstreamClient::new(UpstreamConfig {
            default_model: model.to_string(),
            ..UpstreamConfig::default()
        })
    }

    #[test]
    fn test_completion_request_prepends_system_prompt() {
        let request = ChatRequest::from_transcript(&[Message::user("build a clock")], None);
        let body = client("fallback/model").completion_request(&request);

        assert_eq!(body.model, "fallback/model");
        assert!(body.stream);
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, "system");
        assert!(body.messages[0].content.contains("---FILE: path/to/file.ext---"));
        assert_eq!(body.messages[1].content, "build a clock");
    }

    #[test]
    fn test_request_model_wins() {
        let request = ChatRequest::from_transcript(&[], Some("custom/model".to_string()));
        assert_eq!(client("x").completion_request(&request).model, "custom/model");

        let blank = ChatRequest::from_transcript(&[], Some("  ".to_string()));
        assert_eq!(client("x").completion_request(&blank).model, "x");
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let request = ChatRequest::from_transcript(&[Message::user("hi")], None);
        let result = client("x").open(&request).await;
        assert!(matches!(result, Err(UpstreamError::MissingApiKey)));
    }
}
