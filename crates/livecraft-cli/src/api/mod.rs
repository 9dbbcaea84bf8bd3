//! Client for the chat relay

use anyhow::{Context, Result};
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use livecraft_types::ChatRequest;
use reqwest::Client as ReqwestClient;

pub type ByteStream = BoxStream<'static, reqwest::Result<Bytes>>;

pub struct Client {
    http: ReqwestClient,
    endpoint: String,
}

impl Client {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: ReqwestClient::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Start a chat turn and hand back the raw response body
    pub async fn stream_chat(&self, request: &ChatRequest) -> Result<ByteStream> {
        tracing::debug!(
            endpoint = %self.endpoint,
            messages = request.messages.len(),
            "Sending chat request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .context("Failed to send chat request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
            anyhow::bail!(
                "Chat request failed ({}): {}",
                status,
                error["error"].as_str().unwrap_or("unknown error")
            );
        }

        Ok(response.bytes_stream().boxed())
    }
}
