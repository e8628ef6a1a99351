//! Remote judge client: submit code, poll until terminal
//!
//! Two-phase protocol against a Judge0-compatible service. A POST creates a
//! submission and returns an opaque token; GETs by token are repeated at a
//! fixed interval until the status leaves the pending range. Polling is
//! bounded by configuration and checks the run's cancellation token between
//! polls so an abandoned run stops hitting the network.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::RemoteJudgeConfig;
use crate::core_types::LanguageId;
use crate::errors::PlaygroundError;

/// Fixed mapping from playground languages to the judge's numeric ids.
pub fn judge_language_id(language: LanguageId) -> Option<u32> {
    match language {
        LanguageId::Javascript => Some(93),
        LanguageId::Python => Some(71),
        LanguageId::Java => Some(62),
        LanguageId::Csharp => Some(51),
        LanguageId::Go => Some(60),
        LanguageId::Html => None,
    }
}

#[derive(Debug, Serialize)]
struct SubmissionRequest<'a> {
    source_code: &'a str,
    language_id: u32,
}

#[derive(Debug, Deserialize)]
struct SubmissionToken {
    token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SubmissionStatus {
    pub id: i32,
    #[serde(default)]
    pub description: String,
}

/// A submission as reported by the judge. Status ids 1 (queued) and 2
/// (processing) are pending; anything above is terminal.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RemoteSubmission {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub message: Option<String>,
    pub status: Option<SubmissionStatus>,
}

impl RemoteSubmission {
    pub fn is_terminal(&self) -> bool {
        self.status.as_ref().map(|s| s.id > 2).unwrap_or(false)
    }

    /// Normalize the judge's fields into one text block: stdout first, then
    /// labeled stderr, compile output, and message sections, each only when
    /// non-empty.
    pub fn render(&self) -> String {
        let mut sections = Vec::new();
        if let Some(stdout) = self.stdout.as_deref().filter(|s| !s.is_empty()) {
            sections.push(stdout.to_string());
        }
        if let Some(stderr) = self.stderr.as_deref().filter(|s| !s.is_empty()) {
            sections.push(format!("Stderr:\n{}", stderr));
        }
        if let Some(compile_output) = self.compile_output.as_deref().filter(|s| !s.is_empty()) {
            sections.push(format!("Compile Output:\n{}", compile_output));
        }
        if let Some(message) = self.message.as_deref().filter(|s| !s.is_empty()) {
            sections.push(format!("Message:\n{}", message));
        }
        sections.join("\n")
    }
}

pub struct RemoteExecutionClient {
    client: Client,
    config: RemoteJudgeConfig,
}

impl RemoteExecutionClient {
    pub fn new(config: RemoteJudgeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let host = &self.config.api_host;
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}{}", host, path)
        } else {
            format!("https://{}{}", host, path)
        }
    }

    fn check_credentials(&self) -> Result<(), PlaygroundError> {
        if self.config.api_key.is_empty() || self.config.api_host.is_empty() {
            return Err(PlaygroundError::Configuration(
                "Judge API key or host is not configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a submission and return its token.
    pub async fn submit(&self, source: &str, language: LanguageId) -> Result<String, PlaygroundError> {
        self.check_credentials()?;

        let language_id = judge_language_id(language).ok_or_else(|| {
            PlaygroundError::Validation(format!(
                "Unsupported language for remote execution: {}",
                language
            ))
        })?;

        let url = self.endpoint("/submissions?base64_encoded=false&wait=false");
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("X-RapidAPI-Key", &self.config.api_key)
            .header("X-RapidAPI-Host", &self.config.api_host)
            .json(&SubmissionRequest {
                source_code: source,
                language_id,
            })
            .send()
            .await
            .map_err(|e| PlaygroundError::RemoteProtocol(format!("Submit request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PlaygroundError::RemoteProtocol(format!(
                "Judge API error: {} - {}",
                status, error_text
            )));
        }

        let token: SubmissionToken = response.json().await.map_err(|e| {
            PlaygroundError::RemoteProtocol(format!("Failed to parse submit response: {}", e))
        })?;

        token.token.filter(|t| !t.is_empty()).ok_or_else(|| {
            PlaygroundError::RemoteProtocol("Failed to get submission token from judge".to_string())
        })
    }

    /// Fetch the current state of a submission by token.
    pub async fn fetch(&self, token: &str) -> Result<RemoteSubmission, PlaygroundError> {
        self.check_credentials()?;

        let url = self.endpoint(&format!("/submissions/{}?base64_encoded=false", token));
        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", &self.config.api_key)
            .header("X-RapidAPI-Host", &self.config.api_host)
            .send()
            .await
            .map_err(|e| PlaygroundError::RemoteProtocol(format!("Poll request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(PlaygroundError::RemoteProtocol(format!(
                "Judge API error: {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            PlaygroundError::RemoteProtocol(format!("Failed to parse submission: {}", e))
        })
    }

    /// Submit and poll until the submission reaches a terminal status, the
    /// poll bound is exhausted, or the run is cancelled.
    pub async fn execute(
        &self,
        source: &str,
        language: LanguageId,
        cancel: &CancellationToken,
    ) -> Result<RemoteSubmission, PlaygroundError> {
        let token = self.submit(source, language).await?;
        log::debug!("Judge submission created with token {}", token);

        let mut attempts: u32 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(PlaygroundError::Superseded);
            }

            let submission = self.fetch(&token).await?;
            if submission.is_terminal() {
                return Ok(submission);
            }

            attempts += 1;
            if let Some(max) = self.config.max_poll_attempts {
                if attempts >= max {
                    return Err(PlaygroundError::Timeout(format!(
                        "Submission {} still pending after {} polls",
                        token, attempts
                    )));
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(PlaygroundError::Superseded),
                _ = tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms)) => {}
            }
        }
    }
}
