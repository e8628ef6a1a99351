//! HTTP routes: run-as-SSE, preview composition, template listing.

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use codepad_core::preview::{PreviewComposer, PreviewDocument, WebProject};
use codepad_core::router::RunOutcome;
use codepad_core::templates::{describe_all, starter_web, TemplateDescriptor, TemplateId};
use codepad_core::{
    ExecutionRequest, ExecutionRouter, LanguageId, PlaygroundConfig, RunEvent, TemplateKind,
};

use crate::error::{Result, ServerError};
use crate::sse::create_sse_response;

const DEFAULT_SESSION: &str = "default";

/// Shared server state: one execution router per editor session, created on
/// first use and held for the life of the process.
#[derive(Clone)]
pub struct AppState {
    config: PlaygroundConfig,
    sessions: Arc<Mutex<HashMap<String, Arc<ExecutionRouter>>>>,
}

impl AppState {
    pub fn new(config: PlaygroundConfig) -> Self {
        Self {
            config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn session_router(&self, session_id: &str) -> Arc<ExecutionRouter> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(ExecutionRouter::new(self.config.clone())))
            .clone()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/templates", get(templates_handler))
        .route("/preview", post(preview_handler))
        .route("/run", post(run_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
struct TemplateListing {
    #[serde(flatten)]
    descriptor: TemplateDescriptor,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    web: Option<WebProject>,
}

async fn templates_handler() -> Json<Vec<TemplateListing>> {
    let listings = describe_all()
        .into_iter()
        .map(|descriptor| {
            let web = (descriptor.id == TemplateId::Web).then(starter_web);
            TemplateListing {
                source: descriptor.id.starter_source().to_string(),
                descriptor,
                web,
            }
        })
        .collect();
    Json(listings)
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub template: TemplateKind,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
    #[serde(default)]
    pub source: String,
}

async fn preview_handler(
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewDocument>> {
    match request.template {
        TemplateKind::Web => Ok(Json(PreviewComposer::compose_web(&WebProject {
            html: request.html,
            css: request.css,
            js: request.js,
        }))),
        TemplateKind::React => Ok(Json(PreviewComposer::compose_react(&request.source))),
        TemplateKind::Vue => Ok(Json(PreviewComposer::compose_vue(&request.source))),
        TemplateKind::SingleFile => Err(ServerError::invalid_request(
            "single-file templates have no preview document",
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub source_code: String,
    pub language: LanguageId,
    pub template: TemplateKind,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Cancels a still-running execution when the client disconnects before the
/// stream completed.
struct RunAbortGuard {
    router: Arc<ExecutionRouter>,
    generation: Cell<Option<u64>>,
    finished: Cell<bool>,
}

impl Drop for RunAbortGuard {
    fn drop(&mut self) {
        if !self.finished.get() {
            if let Some(generation) = self.generation.get() {
                log::debug!(
                    "Client went away mid-run; cancelling generation {}",
                    generation
                );
                self.router.cancel_if_current(generation);
            }
        }
    }
}

async fn run_handler(State(state): State<AppState>, Json(request): Json<RunRequest>) -> Response {
    let session_id = request
        .session_id
        .clone()
        .unwrap_or_else(|| DEFAULT_SESSION.to_string());
    let router = state.session_router(&session_id);

    let stream = async_stream::stream! {
        let mut rx = router.subscribe();
        let baseline = rx.borrow_and_update().generation;

        let exec_request =
            ExecutionRequest::new(request.source_code, request.language, request.template);
        let run_router = router.clone();
        let mut run = tokio::spawn(async move { run_router.run(exec_request).await });

        let guard = RunAbortGuard {
            router: router.clone(),
            generation: Cell::new(None),
            finished: Cell::new(false),
        };
        let mut started = false;

        loop {
            tokio::select! {
                result = &mut run => {
                    match result {
                        Ok(Ok(RunOutcome::PreviewRefreshed { refresh_key })) => {
                            yield RunEvent::PreviewRefreshed { refresh_key };
                        }
                        Ok(Ok(RunOutcome::Completed { generation, .. })) => {
                            if !started {
                                yield RunEvent::RunStarted { generation };
                            }
                            // Drain the final content; the watch channel only
                            // retains the latest value.
                            let snapshot = router.output_snapshot();
                            if snapshot.generation == generation {
                                yield RunEvent::OutputUpdate {
                                    generation,
                                    content: snapshot.content,
                                };
                            }
                            yield RunEvent::RunFinished { generation };
                        }
                        Ok(Err(err)) => {
                            let snapshot = router.output_snapshot();
                            if snapshot.generation > baseline {
                                if !started {
                                    yield RunEvent::RunStarted { generation: snapshot.generation };
                                }
                                yield RunEvent::OutputUpdate {
                                    generation: snapshot.generation,
                                    content: snapshot.content,
                                };
                                yield RunEvent::RunError {
                                    generation: snapshot.generation,
                                    message: err.to_string(),
                                };
                            } else {
                                yield RunEvent::RunError {
                                    generation: baseline,
                                    message: err.to_string(),
                                };
                            }
                        }
                        Err(join_err) => {
                            log::error!("Run task failed: {}", join_err);
                            yield RunEvent::RunError {
                                generation: router.output_snapshot().generation,
                                message: "Execution task failed".to_string(),
                            };
                        }
                    }
                    guard.finished.set(true);
                    break;
                }
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let update = rx.borrow_and_update().clone();
                    if update.generation <= baseline {
                        continue;
                    }
                    if !started {
                        started = true;
                        guard.generation.set(Some(update.generation));
                        yield RunEvent::RunStarted { generation: update.generation };
                    }
                    yield RunEvent::OutputUpdate {
                        generation: update.generation,
                        content: update.content,
                    };
                }
            }
        }
    };

    create_sse_response(stream)
}
