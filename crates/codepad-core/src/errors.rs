//! Error types for the playground execution pipeline
//!
//! Every failure a run can produce is captured here, categorized by where it
//! originates (configuration, user input, remote judge, interpreted code,
//! simulator). The router converts all of these into user-visible
//! notifications plus an error line in the canonical output; none are allowed
//! to escape a Run unhandled.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PlaygroundError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Remote judge error: {0}")]
    RemoteProtocol(String),
    #[error("Runtime execution error: {0}")]
    RuntimeExecution(String),
    #[error("Simulation error: {0}")]
    Simulation(String),
    #[error("Execution timed out: {0}")]
    Timeout(String),
    #[error("An execution is already in progress")]
    AlreadyRunning,
    #[error("Execution was superseded by a newer run")]
    Superseded,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaygroundError {
    /// True for failures rejected before any backend was dispatched. These
    /// never touch the canonical output; they surface only as notifications.
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            PlaygroundError::Configuration(_)
                | PlaygroundError::Validation(_)
                | PlaygroundError::AlreadyRunning
        )
    }
}
