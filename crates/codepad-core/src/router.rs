//! Execution routing: one Run action, one backend, one canonical output
//!
//! The router owns the shared output state and the in-flight bookkeeping.
//! Every run follows the same shape regardless of backend: settle the
//! routing decision and reject bad input before anything is published, bump
//! the generation, emit the placeholder, then write results as they arrive.
//! A per-run cancellation token is checked before every state write so an
//! abandoned run can never touch output that belongs to its successor.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::backends::sandbox::render_lines;
use crate::backends::{
    select_backend, BackendKind, LocalInterpreterSandbox, PredictiveOutputSimulator,
    RemoteExecutionClient,
};
use crate::config::PlaygroundConfig;
use crate::core_types::ExecutionRequest;
use crate::errors::PlaygroundError;
use crate::output::{CanonicalOutput, OutputState};
use crate::textgen::{create_generator, TextGenerator};

/// What a completed Run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A preview template: the preview surface should re-render under the
    /// new refresh key. No backend was invoked.
    PreviewRefreshed { refresh_key: u64 },
    /// A backend run completed; its output lives under this generation.
    Completed { generation: u64, backend: BackendKind },
}

pub struct ExecutionRouter {
    config: PlaygroundConfig,
    remote: Option<Arc<RemoteExecutionClient>>,
    generator: Option<Arc<dyn TextGenerator>>,
    sandbox: LocalInterpreterSandbox,
    output: Arc<OutputState>,
    refresh_key: AtomicU64,
    in_flight: AtomicBool,
    active: Mutex<CancellationToken>,
}

/// Releases the in-flight flag on every exit path, including panics and
/// dropped futures.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl ExecutionRouter {
    /// Build a router from configuration, resolving the remote client and
    /// text generator it can offer. An unconfigured simulator is tolerated
    /// here and reported only when a run actually needs it.
    pub fn new(config: PlaygroundConfig) -> Self {
        let remote = config
            .remote
            .clone()
            .map(|remote_config| Arc::new(RemoteExecutionClient::new(remote_config)));
        let generator = match create_generator(&config.simulator) {
            Ok(generator) => Some(generator),
            Err(err) => {
                log::warn!("Simulator unavailable: {}", err);
                None
            }
        };
        Self::assemble(config, remote, generator)
    }

    /// Build a router with an injected text generator.
    pub fn with_generator(config: PlaygroundConfig, generator: Arc<dyn TextGenerator>) -> Self {
        let remote = config
            .remote
            .clone()
            .map(|remote_config| Arc::new(RemoteExecutionClient::new(remote_config)));
        Self::assemble(config, remote, Some(generator))
    }

    fn assemble(
        config: PlaygroundConfig,
        remote: Option<Arc<RemoteExecutionClient>>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self {
            config,
            remote,
            generator,
            sandbox: LocalInterpreterSandbox::new(),
            output: Arc::new(OutputState::new()),
            refresh_key: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
            active: Mutex::new(CancellationToken::new()),
        }
    }

    /// Drive one Run to completion, publishing output updates along the way.
    ///
    /// Pre-dispatch failures (validation, missing configuration, re-entrant
    /// invocation) leave the canonical output untouched. Backend failures are
    /// appended to the output as an error line and also returned, so the
    /// caller can raise a notification.
    pub async fn run(&self, request: ExecutionRequest) -> Result<RunOutcome, PlaygroundError> {
        let backend = select_backend(&request, &self.config);

        if backend == BackendKind::PreviewOnly {
            let refresh_key = self.refresh_key.fetch_add(1, Ordering::SeqCst) + 1;
            log::debug!("Preview refresh {} for {:?}", refresh_key, request.template);
            return Ok(RunOutcome::PreviewRefreshed { refresh_key });
        }

        if request.source_code.trim().is_empty() {
            return Err(PlaygroundError::Validation(
                "No code to run. Write some code in the editor before running.".to_string(),
            ));
        }

        if matches!(backend, BackendKind::Simulation { .. }) && self.generator.is_none() {
            return Err(PlaygroundError::Configuration(
                "Neither remote execution credentials nor a simulator API key are configured"
                    .to_string(),
            ));
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PlaygroundError::AlreadyRunning);
        }
        let _guard = InFlightGuard {
            flag: &self.in_flight,
        };

        let cancel = CancellationToken::new();
        self.swap_active(cancel.clone());

        let generation = self.output.begin_run();
        self.output
            .replace(generation, format!("> Running {}...\n", request.file_name()))?;
        log::debug!(
            "Run generation {} dispatching to {} backend",
            generation,
            backend.label()
        );

        match self.dispatch(&request, backend, generation, &cancel).await {
            Ok(()) => Ok(RunOutcome::Completed {
                generation,
                backend,
            }),
            Err(err) => {
                log::error!("Run failed via {} backend: {}", backend.label(), err);
                if !matches!(err, PlaygroundError::Superseded) {
                    let _ = self.output.append(generation, &format!("\n{}", err));
                }
                Err(err)
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ExecutionRequest,
        backend: BackendKind,
        generation: u64,
        cancel: &CancellationToken,
    ) -> Result<(), PlaygroundError> {
        match backend {
            BackendKind::PreviewOnly => Ok(()),
            BackendKind::Local => {
                let lines = self.sandbox.run_async(request.source_code.clone()).await?;
                if cancel.is_cancelled() {
                    return Err(PlaygroundError::Superseded);
                }
                self.output.append(generation, &render_lines(&lines))
            }
            BackendKind::Remote => {
                let client = self.remote.as_ref().ok_or_else(|| {
                    PlaygroundError::Configuration(
                        "Remote execution credentials are not configured".to_string(),
                    )
                })?;
                let submission = client
                    .execute(&request.source_code, request.language, cancel)
                    .await?;
                if cancel.is_cancelled() {
                    return Err(PlaygroundError::Superseded);
                }
                self.output.append(generation, &submission.render())
            }
            BackendKind::Simulation { streaming } => {
                let generator = self.generator.clone().ok_or_else(|| {
                    PlaygroundError::Configuration("Simulator is not configured".to_string())
                })?;
                let simulator = PredictiveOutputSimulator::new(generator);
                if streaming {
                    let mut stream = simulator
                        .predict_stream(&request.source_code, request.language)
                        .await?;
                    while let Some(chunk) = stream.next().await {
                        let chunk = chunk?;
                        if cancel.is_cancelled() {
                            return Err(PlaygroundError::Superseded);
                        }
                        self.output.append(generation, &chunk)?;
                    }
                    Ok(())
                } else {
                    let predicted = simulator
                        .predict(&request.source_code, request.language)
                        .await?;
                    if cancel.is_cancelled() {
                        return Err(PlaygroundError::Superseded);
                    }
                    self.output.append(generation, &predicted)
                }
            }
        }
    }

    fn swap_active(&self, token: CancellationToken) {
        if let Ok(mut active) = self.active.lock() {
            active.cancel();
            *active = token;
        }
    }

    /// Cancel the in-flight run, if any. Its next write is refused and the
    /// run resolves with `Superseded`.
    pub fn cancel_active(&self) {
        if let Ok(active) = self.active.lock() {
            active.cancel();
        }
    }

    /// Cancel the in-flight run only if the given generation is still the
    /// current one. Used by surfaces tearing down mid-run.
    pub fn cancel_if_current(&self, generation: u64) {
        if self.output.snapshot().generation == generation {
            self.cancel_active();
        }
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<CanonicalOutput> {
        self.output.subscribe()
    }

    pub fn output_snapshot(&self) -> CanonicalOutput {
        self.output.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn preview_refresh_key(&self) -> u64 {
        self.refresh_key.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }
}
