//! Execution core for the Codepad browser playground.
//!
//! This crate decides, for a given template and language, how a "Run" action
//! obtains an observable result and how that result is merged into the
//! editor's live view. The architecture centers on a small number of
//! subsystems:
//!
//! - **Execution routing**: one parameterized router that selects exactly one
//!   backend per run (remote judge, embedded interpreter, predictive
//!   simulator) or refreshes the preview surface
//! - **Output presentation**: a generation-keyed canonical output that lets
//!   terminal and preview surfaces distinguish "new run, clear" from "same
//!   run, more content" and drop stale results from superseded runs
//! - **Preview composition**: assembly of renderable documents for the
//!   web/react/vue templates, independent of the execution backends
//! - **Templates and sessions**: the selectable starter configurations and
//!   the per-page editor state that ties the pieces together

pub mod backends;
pub mod config;
pub mod core_types;
pub mod errors;
pub mod events;
pub mod output;
pub mod preview;
pub mod router;
pub mod session;
pub mod templates;
pub mod textgen;

pub use config::{PlaygroundConfig, RemoteJudgeConfig, SimulatorConfig};
pub use core_types::{CapturedOutputLine, ExecutionRequest, GeneratedCode, LanguageId, OutputChannel, TemplateKind};
pub use errors::PlaygroundError;
pub use events::RunEvent;
pub use output::{CanonicalOutput, OutputState, RenderDirective, TerminalReconciler};
pub use router::{ExecutionRouter, RunOutcome};
pub use session::EditorSession;
pub use templates::TemplateId;
pub use textgen::TextGenerator;

#[cfg(test)]
pub mod test_utils;
