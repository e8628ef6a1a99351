//! Output-producing backends and the routing decision between them
//!
//! A run is satisfied by exactly one backend. Selection is a pure function of
//! the request and the configuration, expressed as a tagged variant so the
//! decision lives in one place instead of template-specific branches
//! scattered across call sites.

use crate::config::PlaygroundConfig;
use crate::core_types::{ExecutionRequest, LanguageId};

pub mod remote;
pub mod sandbox;
pub mod simulator;

pub use remote::{RemoteExecutionClient, RemoteSubmission};
pub use sandbox::LocalInterpreterSandbox;
pub use simulator::PredictiveOutputSimulator;

/// Which strategy satisfies a given run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// No backend call; the preview surface re-renders.
    PreviewOnly,
    /// Embedded JavaScript interpreter.
    Local,
    /// Remote judge submission with polling.
    Remote,
    /// Predicted output from the text generator.
    Simulation { streaming: bool },
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::PreviewOnly => "preview",
            BackendKind::Local => "local",
            BackendKind::Remote => "remote",
            BackendKind::Simulation { .. } => "simulation",
        }
    }
}

/// Decide which backend a request routes to.
///
/// Preview templates never dispatch a backend. JavaScript runs locally.
/// The compiled languages go to the remote judge when credentials are
/// configured; everything else falls back to simulation.
pub fn select_backend(request: &ExecutionRequest, config: &PlaygroundConfig) -> BackendKind {
    if request.template.is_preview() {
        return BackendKind::PreviewOnly;
    }

    match request.language {
        LanguageId::Javascript => BackendKind::Local,
        LanguageId::Python | LanguageId::Java | LanguageId::Go | LanguageId::Csharp
            if config.has_remote() =>
        {
            BackendKind::Remote
        }
        _ => BackendKind::Simulation {
            streaming: config.simulator.streaming,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteJudgeConfig;
    use crate::core_types::TemplateKind;

    fn remote_config() -> PlaygroundConfig {
        PlaygroundConfig {
            remote: Some(RemoteJudgeConfig::new("judge.example.com", "key")),
            ..Default::default()
        }
    }

    #[test]
    fn test_preview_templates_never_dispatch() {
        let config = remote_config();
        for template in [TemplateKind::Web, TemplateKind::React, TemplateKind::Vue] {
            let request = ExecutionRequest::new("code", LanguageId::Javascript, template);
            assert_eq!(select_backend(&request, &config), BackendKind::PreviewOnly);
        }
    }

    #[test]
    fn test_javascript_runs_locally_even_with_remote() {
        let config = remote_config();
        let request =
            ExecutionRequest::new("console.log(1)", LanguageId::Javascript, TemplateKind::SingleFile);
        assert_eq!(select_backend(&request, &config), BackendKind::Local);
    }

    #[test]
    fn test_compiled_languages_go_remote_when_configured() {
        let config = remote_config();
        for language in [
            LanguageId::Python,
            LanguageId::Java,
            LanguageId::Go,
            LanguageId::Csharp,
        ] {
            let request = ExecutionRequest::new("code", language, TemplateKind::SingleFile);
            assert_eq!(select_backend(&request, &config), BackendKind::Remote);
        }
    }

    #[test]
    fn test_fallback_to_simulation_without_remote() {
        let config = PlaygroundConfig::default();
        let request = ExecutionRequest::new("print(1)", LanguageId::Python, TemplateKind::SingleFile);
        assert_eq!(
            select_backend(&request, &config),
            BackendKind::Simulation { streaming: false }
        );
    }

    #[test]
    fn test_simulation_streaming_follows_config() {
        let mut config = PlaygroundConfig::default();
        config.simulator.streaming = true;
        let request = ExecutionRequest::new("print(1)", LanguageId::Python, TemplateKind::SingleFile);
        assert_eq!(
            select_backend(&request, &config),
            BackendKind::Simulation { streaming: true }
        );
    }

    #[test]
    fn test_every_pair_selects_exactly_one_backend() {
        // Exhaustive enumeration: each (template, language) pair routes to a
        // single deterministic backend under both configurations.
        let configs = [PlaygroundConfig::default(), remote_config()];
        let templates = [
            TemplateKind::Web,
            TemplateKind::React,
            TemplateKind::Vue,
            TemplateKind::SingleFile,
        ];
        let languages = [
            LanguageId::Javascript,
            LanguageId::Python,
            LanguageId::Java,
            LanguageId::Go,
            LanguageId::Csharp,
            LanguageId::Html,
        ];

        for config in &configs {
            for template in templates {
                for language in languages {
                    let request = ExecutionRequest::new("code", language, template);
                    let first = select_backend(&request, config);
                    let second = select_backend(&request, config);
                    assert_eq!(first, second);
                }
            }
        }
    }
}
