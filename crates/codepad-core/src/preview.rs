//! Preview document composition for the web, react, and vue templates
//!
//! Rendering is handled by an external sandboxed surface (an iframe or a
//! component-sandbox provider); this module only assembles what that surface
//! consumes. Documents are rebuilt from the current sources on every call and
//! carry no identity of their own; the preview refresh key decides when the
//! surface actually remounts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The three files of a web template project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WebProject {
    pub html: String,
    pub css: String,
    pub js: String,
}

/// One file handed to the component sandbox. Hidden files are part of the
/// runnable project but not shown in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewFile {
    pub code: String,
    #[serde(default)]
    pub hidden: bool,
}

/// What the preview surface renders: either a complete HTML document for an
/// iframe `srcdoc`, or a file map for the component sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewDocument {
    Document { html: String },
    ComponentFiles { files: BTreeMap<String, PreviewFile> },
}

/// Base styles injected ahead of the user's CSS so an empty project still
/// renders something presentable.
const WEB_BASE_STYLES: &str = r#"body {
  font-family: sans-serif;
  background-color: #ffffff;
  color: #000000;
}
#root { padding: 1rem; }
button {
  background-color: #3b82f6;
  color: #ffffff;
  padding: 0.5rem 1rem;
  border: none;
  border-radius: 0.5rem;
  cursor: pointer;
}
button:hover {
  opacity: 0.9;
}"#;

/// Bootstrap file mounted next to the user's component in the react preview.
const REACT_INDEX_JS: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';

const root = ReactDOM.createRoot(document.getElementById('root'));
root.render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);"#;

pub struct PreviewComposer;

impl PreviewComposer {
    /// Combine the web project's three files into one sandboxable document.
    pub fn compose_web(project: &WebProject) -> PreviewDocument {
        let html = format!(
            "<!DOCTYPE html>\n<html>\n  <head>\n    <style>\n{base}\n{css}\n    </style>\n  </head>\n  <body>\n{html}\n    <script>{js}</script>\n  </body>\n</html>\n",
            base = WEB_BASE_STYLES,
            css = project.css,
            html = project.html,
            js = project.js,
        );
        PreviewDocument::Document { html }
    }

    /// Wrap a react component source into the file map the component sandbox
    /// consumes. The bootstrap stays hidden from the editor.
    pub fn compose_react(component_source: &str) -> PreviewDocument {
        let mut files = BTreeMap::new();
        files.insert(
            "/App.js".to_string(),
            PreviewFile {
                code: component_source.to_string(),
                hidden: false,
            },
        );
        files.insert(
            "/index.js".to_string(),
            PreviewFile {
                code: REACT_INDEX_JS.to_string(),
                hidden: true,
            },
        );
        PreviewDocument::ComponentFiles { files }
    }

    /// Vue sources are already complete documents; pass them through.
    pub fn compose_vue(document_source: &str) -> PreviewDocument {
        PreviewDocument::Document {
            html: document_source.to_string(),
        }
    }
}
