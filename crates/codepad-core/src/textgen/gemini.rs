//! Google Gemini API client implementation
//!
//! Native client for Google's Generative AI endpoints. Supports one-shot
//! generation and server-sent-event streaming; only text parts are requested
//! or parsed, which is all the simulator needs.

use async_stream::try_stream;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

use crate::errors::PlaygroundError;
use crate::textgen::{TextChunkStream, TextGenerator};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

pub struct GeminiClient {
    api_key: String,
    model: String,
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: Client::new(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Create a client with a custom base URL, used by tests to point at a
    /// mock server.
    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            client: Client::new(),
            base_url,
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetails,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetails {
    code: u16,
    message: String,
}

fn extract_text(response: GeminiResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

impl GeminiClient {
    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.0,
                max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            },
        }
    }

    async fn error_from_response(response: reqwest::Response) -> PlaygroundError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if let Ok(gemini_error) = serde_json::from_str::<GeminiError>(&error_text) {
            return PlaygroundError::Simulation(format!(
                "Gemini API error ({}): {}",
                gemini_error.error.code, gemini_error.error.message
            ));
        }

        PlaygroundError::Simulation(format!("HTTP {} error: {}", status, error_text))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, PlaygroundError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| PlaygroundError::Simulation(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| PlaygroundError::Simulation(format!("Failed to parse response: {}", e)))?;

        Ok(extract_text(gemini_response))
    }

    async fn complete_stream(&self, prompt: &str) -> Result<TextChunkStream, PlaygroundError> {
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("accept", "text/event-stream")
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| PlaygroundError::Simulation(format!("Stream request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let byte_stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Interrupted, e.to_string()));
        let mut lines = StreamReader::new(byte_stream).lines();

        let chunk_stream = try_stream! {
            loop {
                let line = lines
                    .next_line()
                    .await
                    .map_err(|e| PlaygroundError::Simulation(format!("Stream read failed: {}", e)))?;
                let Some(line) = line else { break };
                let Some(data) = line.strip_prefix("data:") else { continue };
                let data = data.trim();
                if data.is_empty() || data == "[DONE]" {
                    continue;
                }
                let chunk: GeminiResponse = serde_json::from_str(data).map_err(|e| {
                    PlaygroundError::Simulation(format!("Malformed stream chunk: {}", e))
                })?;
                let text = extract_text(chunk);
                if !text.is_empty() {
                    yield text;
                }
            }
        };

        Ok(Box::pin(chunk_stream))
    }
}
