// src/test_utils/scripted_generator.rs
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::errors::PlaygroundError;
use crate::textgen::{TextChunkStream, TextGenerator};

/// One scripted answer from the generator.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Batch(String),
    Chunks(Vec<String>),
    Fail(String),
}

/// A generator that replays scripted responses in order and records the
/// prompts it was asked.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    prompts: Mutex<Vec<String>>,
    chunk_delay: Duration,
}

impl ScriptedGenerator {
    pub fn sequence(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            prompts: Mutex::new(Vec::new()),
            chunk_delay: Duration::ZERO,
        }
    }

    /// A generator that repeatedly answers with the same completed string.
    pub fn batch(text: &str) -> Self {
        Self::sequence(vec![ScriptedResponse::Batch(text.to_string()); 8])
    }

    /// A generator that answers once with the given chunk sequence.
    pub fn chunks(chunks: Vec<&str>) -> Self {
        Self::sequence(vec![ScriptedResponse::Chunks(
            chunks.into_iter().map(str::to_string).collect(),
        )])
    }

    /// Sleep this long before each streamed chunk.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_response(&self, prompt: &str) -> Result<ScriptedResponse, PlaygroundError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PlaygroundError::Simulation("No scripted responses left".to_string()))
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, PlaygroundError> {
        match self.next_response(prompt)? {
            ScriptedResponse::Batch(text) => Ok(text),
            ScriptedResponse::Chunks(chunks) => Ok(chunks.join("")),
            ScriptedResponse::Fail(message) => Err(PlaygroundError::Simulation(message)),
        }
    }

    async fn complete_stream(&self, prompt: &str) -> Result<TextChunkStream, PlaygroundError> {
        let chunks = match self.next_response(prompt)? {
            ScriptedResponse::Batch(text) => vec![text],
            ScriptedResponse::Chunks(chunks) => chunks,
            ScriptedResponse::Fail(message) => return Err(PlaygroundError::Simulation(message)),
        };
        let delay = self.chunk_delay;
        let stream = async_stream::stream! {
            for chunk in chunks {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(chunk);
            }
        };
        Ok(Box::pin(stream))
    }
}

/// A generator whose every call fails, for error-path tests.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String, PlaygroundError> {
        Err(PlaygroundError::Simulation(
            "The text generator is unavailable".to_string(),
        ))
    }

    async fn complete_stream(&self, _prompt: &str) -> Result<TextChunkStream, PlaygroundError> {
        Err(PlaygroundError::Simulation(
            "The text generator is unavailable".to_string(),
        ))
    }
}
