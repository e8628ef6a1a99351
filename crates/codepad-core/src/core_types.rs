//! Core type definitions shared across the execution pipeline
//!
//! These types form the contract between the editor surfaces and the
//! execution router: what a run request looks like, which languages and
//! templates exist, and the shapes output takes on its way to a surface.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::PlaygroundError;

/// Languages the editor can hold. Only a subset reaches the execution
/// backends; `Html` exists for the vue/web editors and always falls through
/// to simulation if it ever reaches a single-file run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    Javascript,
    Python,
    Java,
    Go,
    Csharp,
    Html,
}

impl LanguageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::Javascript => "javascript",
            LanguageId::Python => "python",
            LanguageId::Java => "java",
            LanguageId::Go => "go",
            LanguageId::Csharp => "csharp",
            LanguageId::Html => "html",
        }
    }

    /// File extension used when naming the run target (`main.<ext>`) and
    /// for downloads.
    pub fn file_extension(&self) -> &'static str {
        match self {
            LanguageId::Javascript => "js",
            LanguageId::Python => "py",
            LanguageId::Java => "java",
            LanguageId::Go => "go",
            LanguageId::Csharp => "cs",
            LanguageId::Html => "html",
        }
    }

    /// Guess the language from a file extension, for CLI invocations.
    pub fn from_extension(ext: &str) -> Option<LanguageId> {
        match ext {
            "js" | "mjs" => Some(LanguageId::Javascript),
            "py" => Some(LanguageId::Python),
            "java" => Some(LanguageId::Java),
            "go" => Some(LanguageId::Go),
            "cs" => Some(LanguageId::Csharp),
            "html" | "htm" => Some(LanguageId::Html),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageId {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "javascript" | "js" => Ok(LanguageId::Javascript),
            "python" | "python3" => Ok(LanguageId::Python),
            "java" => Ok(LanguageId::Java),
            "go" => Ok(LanguageId::Go),
            "csharp" | "cs" | "c#" => Ok(LanguageId::Csharp),
            "html" => Ok(LanguageId::Html),
            other => Err(PlaygroundError::Validation(format!(
                "Unsupported language: {}",
                other
            ))),
        }
    }
}

/// The structural kind of the current template, which decides whether Run
/// dispatches a backend or only refreshes the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Web,
    React,
    Vue,
    SingleFile,
}

impl TemplateKind {
    /// Templates whose Run action re-renders the preview iframe instead of
    /// invoking an execution backend.
    pub fn is_preview(&self) -> bool {
        matches!(self, TemplateKind::Web | TemplateKind::React | TemplateKind::Vue)
    }
}

/// One Run invocation. Immutable once submitted; a new Run builds a new
/// request from the editor's current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub source_code: String,
    pub language: LanguageId,
    pub template: TemplateKind,
}

impl ExecutionRequest {
    pub fn new(source_code: impl Into<String>, language: LanguageId, template: TemplateKind) -> Self {
        Self {
            source_code: source_code.into(),
            language,
            template,
        }
    }

    /// The display name of the file being run, e.g. `main.py`.
    pub fn file_name(&self) -> String {
        format!("main.{}", self.language.file_extension())
    }
}

/// Output channel of a captured line from the embedded interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputChannel {
    Stdout,
    Stderr,
}

/// One line captured during local interpretation, in interceptor order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedOutputLine {
    pub channel: OutputChannel,
    pub text: String,
}

impl CapturedOutputLine {
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            channel: OutputChannel::Stdout,
            text: text.into(),
        }
    }

    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            channel: OutputChannel::Stderr,
            text: text.into(),
        }
    }
}

/// Code handed back from the AI panel. The original inferred this shape at
/// runtime (string vs. object with html/css/js); here the producer resolves
/// it once into a tagged union and consumers match on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedCode {
    SingleFile { source: String },
    WebProject { html: String, css: String, js: String },
    Components { files: BTreeMap<String, String> },
}
