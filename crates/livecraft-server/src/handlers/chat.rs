//! `POST /api/chat`

use crate::services::{spawn_relay, UpstreamError};
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use livecraft_types::ChatRequest;
use serde_json::json;
use std::convert::Infallible;

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    let upstream = match state.upstream.open(&request).await {
        Ok(response) => response,
        Err(UpstreamError::Status { status, body }) => {
            tracing::warn!(status, "Upstream rejected request");
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            return error_response(code, format!("Upstream error: {} - {}", status, body));
        }
        Err(e @ UpstreamError::MissingApiKey) => {
            tracing::error!("{}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
        Err(e) => {
            tracing::error!("Chat request failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let records = spawn_relay(upstream.bytes_stream()).map(Ok::<_, Infallible>);

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(records),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{UpstreamClient, UpstreamConfig};
    use axum::routing::post;
    use axum::Router;
    use livecraft_types::Message;
    use std::sync::Arc;

    /// Serve `router` on an ephemeral port and return its completions URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    fn state(url: String, api_key: Option<&str>) -> AppState {
        AppState {
            upstream: Arc::new(UpstreamClient::new(UpstreamConfig {
                url,
                api_key: api_key.map(str::to_string),
                ..UpstreamConfig::default()
            })),
        }
    }

    fn request() -> Json<ChatRequest> {
        Json(ChatRequest::from_transcript(&[Message::user("build a button")], None))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_is_500() {
        let response = chat(
            State(state("http://127.0.0.1:9/unused".to_string(), None)),
            request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"], "Upstream API key not configured");
    }

    #[tokio::test]
    async fn test_upstream_status_is_forwarded() {
        let url = serve(Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        ))
        .await;

        let response = chat(State(state(url, Some("key"))), request()).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"], "Upstream error: 429 - slow down");
    }

    #[tokio::test]
    async fn test_streams_relay_records() {
        let upstream_body = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"---FILE: App.tsx---\\n\"}}]}\n\n",
            "data: not json\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"---END FILE---\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        let url = serve(Router::new().route(
            "/v1/chat/completions",
            post(move || async move {
                ([(header::CONTENT_TYPE, "text/event-stream")], upstream_body)
            }),
        ))
        .await;

        let response = chat(State(state(url, Some("key"))), request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );

        assert_eq!(
            body_text(response).await,
            concat!(
                "data: {\"content\":\"---FILE: App.tsx---\\n\"}\n\n",
                "data: {\"content\":\"---END FILE---\"}\n\n",
                "data: [DONE]\n\n",
            )
        );
    }
}
