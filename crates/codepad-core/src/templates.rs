//! Starter templates selectable from the landing page
//!
//! Each template pairs a boilerplate source with the editor language it
//! opens in. The web template is a three-file project; everything else is a
//! single file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core_types::{LanguageId, TemplateKind};
use crate::errors::PlaygroundError;
use crate::preview::WebProject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Web,
    Javascript,
    Python,
    Java,
    Go,
    Csharp,
    React,
    Vue,
}

impl TemplateId {
    pub fn all() -> &'static [TemplateId] {
        &[
            TemplateId::Web,
            TemplateId::Javascript,
            TemplateId::Python,
            TemplateId::Java,
            TemplateId::Go,
            TemplateId::Csharp,
            TemplateId::React,
            TemplateId::Vue,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Web => "web",
            TemplateId::Javascript => "javascript",
            TemplateId::Python => "python",
            TemplateId::Java => "java",
            TemplateId::Go => "go",
            TemplateId::Csharp => "csharp",
            TemplateId::React => "react",
            TemplateId::Vue => "vue",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateId::Web => "Web Project",
            TemplateId::Javascript => "JavaScript",
            TemplateId::Python => "Python",
            TemplateId::Java => "Java",
            TemplateId::Go => "Go",
            TemplateId::Csharp => "C#",
            TemplateId::React => "React.js",
            TemplateId::Vue => "Vue.js",
        }
    }

    pub fn kind(&self) -> TemplateKind {
        match self {
            TemplateId::Web => TemplateKind::Web,
            TemplateId::React => TemplateKind::React,
            TemplateId::Vue => TemplateKind::Vue,
            _ => TemplateKind::SingleFile,
        }
    }

    /// The language the editor opens in for this template.
    pub fn language(&self) -> LanguageId {
        match self {
            TemplateId::Web | TemplateId::Vue => LanguageId::Html,
            TemplateId::Javascript | TemplateId::React => LanguageId::Javascript,
            TemplateId::Python => LanguageId::Python,
            TemplateId::Java => LanguageId::Java,
            TemplateId::Go => LanguageId::Go,
            TemplateId::Csharp => LanguageId::Csharp,
        }
    }

    /// Boilerplate source for single-file templates. The web template seeds
    /// its files from `starter_web` instead.
    pub fn starter_source(&self) -> &'static str {
        match self {
            TemplateId::Web => "",
            TemplateId::Javascript => JAVASCRIPT_STARTER,
            TemplateId::Python => PYTHON_STARTER,
            TemplateId::Java => JAVA_STARTER,
            TemplateId::Go => GO_STARTER,
            TemplateId::Csharp => CSHARP_STARTER,
            TemplateId::React => REACT_STARTER,
            TemplateId::Vue => VUE_STARTER,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "web" => Ok(TemplateId::Web),
            "javascript" | "js" => Ok(TemplateId::Javascript),
            "python" => Ok(TemplateId::Python),
            "java" => Ok(TemplateId::Java),
            "go" => Ok(TemplateId::Go),
            "csharp" => Ok(TemplateId::Csharp),
            "react" => Ok(TemplateId::React),
            "vue" => Ok(TemplateId::Vue),
            other => Err(PlaygroundError::Validation(format!(
                "Unknown template: {}",
                other
            ))),
        }
    }
}

/// Listing entry for template pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: TemplateId,
    pub display_name: String,
    pub kind: TemplateKind,
    pub language: LanguageId,
}

pub fn describe_all() -> Vec<TemplateDescriptor> {
    TemplateId::all()
        .iter()
        .map(|id| TemplateDescriptor {
            id: *id,
            display_name: id.display_name().to_string(),
            kind: id.kind(),
            language: id.language(),
        })
        .collect()
}

/// Starter files for the three-file web project.
pub fn starter_web() -> WebProject {
    WebProject {
        html: WEB_HTML_STARTER.to_string(),
        css: WEB_CSS_STARTER.to_string(),
        js: WEB_JS_STARTER.to_string(),
    }
}

const WEB_HTML_STARTER: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Codepad Web Project</title>
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>"#;

const WEB_CSS_STARTER: &str = r#"body {
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  display: grid;
  place-content: center;
  min-height: 100vh;
  margin: 0;
  background-color: #f0f2f5;
  color: #1c1e21;
}

.container {
  text-align: center;
  padding: 2rem;
  background-color: white;
  border-radius: 12px;
  box-shadow: 0 4px 12px rgba(0, 0, 0, 0.1);
}

button {
  margin-top: 1rem;
  padding: 0.75rem 1.5rem;
  border: none;
  border-radius: 8px;
  background-color: #007bff;
  color: white;
  cursor: pointer;
  font-size: 1rem;
}

button:hover {
  background-color: #0056b3;
}"#;

const WEB_JS_STARTER: &str = r#"const root = document.getElementById('root');

const heading = document.createElement('h1');
heading.textContent = 'Hello, Web!';
root.prepend(heading);

const button = document.createElement('button');
button.textContent = 'Click Me!';
root.appendChild(button);

let clickCount = 0;

button.addEventListener('click', () => {
  clickCount++;
  heading.textContent = `Clicked ${clickCount} times`;
});"#;

const JAVASCRIPT_STARTER: &str = r#"// Welcome to Codepad!
// Try asking the AI to 'create a function to sort an array'.

function greet(name) {
  console.log(`Hello, ${name}!`);
}

greet("World");
"#;

const PYTHON_STARTER: &str = r#"# Welcome to Codepad!
# Try asking the AI to 'create a class for a Dog with a bark method'.

def greet(name):
    print(f"Hello, {name}!")

greet("World")
"#;

const JAVA_STARTER: &str = r#"// Welcome to Codepad!
// Try asking the AI to 'write a method to find the largest number in an array'.

class Main {
  public static void main(String[] args) {
    System.out.println("Hello, World!");
  }
}"#;

const GO_STARTER: &str = r#"// Welcome to Codepad!
// Try asking the AI to 'write a function that returns a slice of strings'.

package main

import "fmt"

func main() {
  fmt.Println("Hello, World!")
}"#;

const CSHARP_STARTER: &str = r#"// Welcome to Codepad!
// Try asking the AI to 'create a Person class with Name and Age properties'.

using System;

class Program
{
    static void Main(string[] args)
    {
        Console.WriteLine("Hello, World!");
    }
}"#;

const REACT_STARTER: &str = r#"// Welcome to Codepad!
// This is a simple React example.
// Try asking the AI to 'create a counter component'.

function App() {
  const [count, setCount] = React.useState(0);

  return (
    <div>
      <h1>React Counter</h1>
      <p>You clicked {count} times</p>
      <button onClick={() => setCount(count + 1)}>
        Click me
      </button>
    </div>
  );
}

export default App;
"#;

const VUE_STARTER: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <script src="https://unpkg.com/vue@3/dist/vue.global.js"></script>
  </head>
  <body>
    <div id="app">{{ message }}</div>
    <script>
      const { createApp } = Vue;
      createApp({
        data() {
          return { message: 'Hello Vue!' };
        }
      }).mount('#app');
    </script>
  </body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_has_consistent_kind_and_language() {
        for id in TemplateId::all() {
            match id.kind() {
                TemplateKind::SingleFile => {
                    assert!(!id.starter_source().is_empty());
                }
                TemplateKind::Web => {
                    let project = starter_web();
                    assert!(project.html.contains("id=\"root\""));
                    assert!(!project.css.is_empty());
                    assert!(!project.js.is_empty());
                }
                TemplateKind::React | TemplateKind::Vue => {
                    assert!(!id.starter_source().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_template_round_trip() {
        for id in TemplateId::all() {
            let parsed: TemplateId = id.as_str().parse().unwrap();
            assert_eq!(parsed, *id);
        }
    }

    #[test]
    fn test_react_template_opens_in_javascript() {
        assert_eq!(TemplateId::React.language(), LanguageId::Javascript);
        assert_eq!(TemplateId::React.kind(), TemplateKind::React);
    }

    #[test]
    fn test_vue_template_opens_in_html() {
        assert_eq!(TemplateId::Vue.language(), LanguageId::Html);
    }

    #[test]
    fn test_describe_all_lists_eight_templates() {
        let descriptors = describe_all();
        assert_eq!(descriptors.len(), 8);
        assert!(descriptors.iter().any(|d| d.display_name == "C#"));
    }
}
