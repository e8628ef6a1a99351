// src/test_utils/mock_judge_server.rs
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct RecordedSubmission {
    pub source_code: String,
    pub language_id: u32,
}

#[derive(Clone)]
struct MockJudgeState {
    /// Polls each token answers with "processing" before going terminal.
    pending_polls: u32,
    terminal: serde_json::Value,
    fail_submissions: bool,
    submissions: Arc<Mutex<Vec<RecordedSubmission>>>,
    poll_counts: Arc<Mutex<HashMap<String, u32>>>,
}

async fn submit_handler(
    State(state): State<MockJudgeState>,
    Json(payload): Json<RecordedSubmission>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    if state.fail_submissions {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            "quota exceeded".to_string(),
        ));
    }
    log::debug!("Mock judge received submission: {:?}", payload);
    state.submissions.lock().unwrap().push(payload);
    let token = uuid::Uuid::new_v4().to_string();
    state.poll_counts.lock().unwrap().insert(token.clone(), 0);
    Ok(Json(serde_json::json!({ "token": token })))
}

async fn poll_handler(
    State(state): State<MockJudgeState>,
    Path(token): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut counts = state.poll_counts.lock().unwrap();
    let count = match counts.get_mut(&token) {
        Some(count) => {
            *count += 1;
            *count
        }
        None => return Err(StatusCode::NOT_FOUND),
    };

    if count <= state.pending_polls {
        Ok(Json(serde_json::json!({
            "stdout": null,
            "stderr": null,
            "compile_output": null,
            "message": null,
            "status": {"id": 2, "description": "Processing"}
        })))
    } else {
        Ok(Json(state.terminal.clone()))
    }
}

/// A scripted Judge0-style server on an ephemeral port. Each submission gets
/// its own token and poll counter, so tests can assert token independence.
pub struct MockJudgeServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    submissions: Arc<Mutex<Vec<RecordedSubmission>>>,
    poll_counts: Arc<Mutex<HashMap<String, u32>>>,
}

impl MockJudgeServer {
    pub async fn start(pending_polls: u32, terminal: serde_json::Value) -> Self {
        Self::start_with(pending_polls, terminal, false).await
    }

    /// A server whose submit endpoint always rejects with an error body.
    pub async fn start_failing() -> Self {
        Self::start_with(0, serde_json::Value::Null, true).await
    }

    async fn start_with(pending_polls: u32, terminal: serde_json::Value, fail_submissions: bool) -> Self {
        let state = MockJudgeState {
            pending_polls,
            terminal,
            fail_submissions,
            submissions: Arc::new(Mutex::new(Vec::new())),
            poll_counts: Arc::new(Mutex::new(HashMap::new())),
        };
        let submissions = state.submissions.clone();
        let poll_counts = state.poll_counts.clone();

        let app = Router::new()
            .route("/submissions", post(submit_handler))
            .route("/submissions/{token}", get(poll_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        log::info!("Mock judge server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| log::error!("Mock judge server error: {}", e));
        });

        Self {
            addr,
            shutdown_tx,
            submissions,
            poll_counts,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn recorded_submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn poll_count(&self, token: &str) -> u32 {
        self.poll_counts
            .lock()
            .unwrap()
            .get(token)
            .copied()
            .unwrap_or(0)
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}
