// src/test_utils/mock_gemini_server.rs
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[derive(Clone)]
struct MockGeminiState {
    chunks: Vec<String>,
}

/// Serves both `:generateContent` and `:streamGenerateContent` for a single
/// scripted completion. The batch endpoint returns the concatenation; the
/// stream endpoint emits one SSE data line per chunk.
async fn model_handler(
    State(state): State<MockGeminiState>,
    Path(model_action): Path<String>,
) -> impl IntoResponse {
    if model_action.ends_with(":streamGenerateContent") {
        let body = state
            .chunks
            .iter()
            .map(|chunk| {
                let payload = serde_json::json!({
                    "candidates": [{"content": {"role": "model", "parts": [{"text": chunk}]}}]
                });
                format!("data: {}\n\n", payload)
            })
            .collect::<String>();
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/event-stream")],
            body,
        )
            .into_response()
    } else if model_action.ends_with(":generateContent") {
        let full: String = state.chunks.concat();
        let payload = serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": full}]}}],
            "usageMetadata": {"totalTokenCount": 1}
        });
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            payload.to_string(),
        )
            .into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

pub struct MockGeminiServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl MockGeminiServer {
    pub async fn start(chunks: Vec<String>) -> Self {
        let state = MockGeminiState { chunks };

        let app = Router::new()
            .route("/models/{model_action}", post(model_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        log::info!("Mock Gemini server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| log::error!("Mock Gemini server error: {}", e));
        });

        Self { addr, shutdown_tx }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}
