//! Per-page editor session state
//!
//! Holds what the editor surfaces mutate between runs: the current template,
//! the single-file source, the web project files, and the router that
//! satisfies Run. All of it is ephemeral; nothing survives the session.

use std::sync::Arc;

use crate::config::PlaygroundConfig;
use crate::core_types::{ExecutionRequest, GeneratedCode, LanguageId};
use crate::errors::PlaygroundError;
use crate::preview::{PreviewComposer, PreviewDocument, WebProject};
use crate::router::{ExecutionRouter, RunOutcome};
use crate::templates::{starter_web, TemplateId};

/// The editable file tab of the web template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebFile {
    Html,
    Css,
    Js,
}

pub struct EditorSession {
    template: TemplateId,
    language: LanguageId,
    source: String,
    web: WebProject,
    router: Arc<ExecutionRouter>,
}

impl EditorSession {
    /// Open a session seeded with the template's boilerplate.
    pub fn new(template: TemplateId, config: PlaygroundConfig) -> Self {
        Self::with_router(template, Arc::new(ExecutionRouter::new(config)))
    }

    pub fn with_router(template: TemplateId, router: Arc<ExecutionRouter>) -> Self {
        Self {
            template,
            language: template.language(),
            source: template.starter_source().to_string(),
            web: starter_web(),
            router,
        }
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn web(&self) -> &WebProject {
        &self.web
    }

    pub fn set_web_file(&mut self, file: WebFile, content: impl Into<String>) {
        let content = content.into();
        match file {
            WebFile::Html => self.web.html = content,
            WebFile::Css => self.web.css = content,
            WebFile::Js => self.web.js = content,
        }
    }

    pub fn router(&self) -> Arc<ExecutionRouter> {
        self.router.clone()
    }

    /// Apply code handed back from the AI panel. The tagged union is
    /// resolved here, once, instead of shape-checking at every call site.
    pub fn apply_generated(&mut self, code: GeneratedCode) {
        match code {
            GeneratedCode::SingleFile { source } => self.source = source,
            GeneratedCode::WebProject { html, css, js } => {
                self.web = WebProject { html, css, js };
            }
            GeneratedCode::Components { files } => {
                if let Some(app) = files.get("/App.js") {
                    self.source = app.clone();
                } else if let Some((_, first)) = files.into_iter().next() {
                    self.source = first;
                }
            }
        }
    }

    /// Run the editor's current content through the router.
    pub async fn run(&self) -> Result<RunOutcome, PlaygroundError> {
        let request =
            ExecutionRequest::new(self.source.clone(), self.language, self.template.kind());
        self.router.run(request).await
    }

    /// Compose the preview document for the current template, if it has one.
    pub fn preview(&self) -> Option<PreviewDocument> {
        match self.template {
            TemplateId::Web => Some(PreviewComposer::compose_web(&self.web)),
            TemplateId::React => Some(PreviewComposer::compose_react(&self.source)),
            TemplateId::Vue => Some(PreviewComposer::compose_vue(&self.source)),
            _ => None,
        }
    }

    /// The display file name for downloads, e.g. `python.py` or `index.css`.
    pub fn download_file_name(&self, active_web_file: Option<WebFile>) -> String {
        match (self.template, active_web_file) {
            (TemplateId::Web, Some(WebFile::Html)) | (TemplateId::Web, None) => {
                "index.html".to_string()
            }
            (TemplateId::Web, Some(WebFile::Css)) => "index.css".to_string(),
            (TemplateId::Web, Some(WebFile::Js)) => "index.js".to_string(),
            (template, _) => format!("{}.{}", template, template.language().file_extension()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::TemplateKind;
    use crate::router::RunOutcome;
    use std::collections::BTreeMap;

    fn session(template: TemplateId) -> EditorSession {
        EditorSession::with_router(
            template,
            Arc::new(ExecutionRouter::with_generator(
                PlaygroundConfig::default(),
                Arc::new(crate::test_utils::scripted_generator::ScriptedGenerator::batch("out")),
            )),
        )
    }

    #[test]
    fn test_new_session_seeds_starter() {
        let session = session(TemplateId::Python);
        assert!(session.source().contains("def greet"));
        assert_eq!(session.language(), LanguageId::Python);
    }

    #[test]
    fn test_apply_single_file() {
        let mut session = session(TemplateId::Python);
        session.apply_generated(GeneratedCode::SingleFile {
            source: "print(42)".to_string(),
        });
        assert_eq!(session.source(), "print(42)");
    }

    #[test]
    fn test_apply_web_project() {
        let mut session = session(TemplateId::Web);
        session.apply_generated(GeneratedCode::WebProject {
            html: "<p>new</p>".to_string(),
            css: "p {}".to_string(),
            js: "1;".to_string(),
        });
        assert_eq!(session.web().html, "<p>new</p>");
    }

    #[test]
    fn test_apply_components_prefers_app() {
        let mut session = session(TemplateId::React);
        let mut files = BTreeMap::new();
        files.insert("/App.js".to_string(), "function App() {}".to_string());
        files.insert("/other.js".to_string(), "nope".to_string());
        session.apply_generated(GeneratedCode::Components { files });
        assert_eq!(session.source(), "function App() {}");
    }

    #[test]
    fn test_preview_per_template() {
        assert!(session(TemplateId::Web).preview().is_some());
        assert!(session(TemplateId::React).preview().is_some());
        assert!(session(TemplateId::Vue).preview().is_some());
        assert!(session(TemplateId::Python).preview().is_none());
    }

    #[test]
    fn test_download_names() {
        let python_session = session(TemplateId::Python);
        assert_eq!(python_session.download_file_name(None), "python.py");

        let web_session = session(TemplateId::Web);
        assert_eq!(web_session.download_file_name(Some(WebFile::Css)), "index.css");
    }

    #[tokio::test]
    async fn test_run_uses_current_state() {
        let mut session = session(TemplateId::Python);
        session.set_source("print('hi')");
        let outcome = session.run().await.unwrap();
        assert!(matches!(outcome, RunOutcome::Completed { .. }));
        assert_eq!(session.template().kind(), TemplateKind::SingleFile);
        assert!(session
            .router()
            .output_snapshot()
            .content
            .contains("out"));
    }

    #[tokio::test]
    async fn test_react_run_refreshes_preview() {
        let session = session(TemplateId::React);
        let outcome = session.run().await.unwrap();
        assert!(matches!(outcome, RunOutcome::PreviewRefreshed { .. }));
    }
}
