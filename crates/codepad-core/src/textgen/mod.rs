//! Text-generation provider abstraction
//!
//! The simulator consumes generation as an opaque capability: a fully formed
//! prompt in, either one completed string or an ordered stream of text
//! fragments out. Providers implement this trait; the Gemini client is the
//! default implementation.

use async_trait::async_trait;
use futures_util::Stream;
use std::env;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::{SimulatorConfig, SIMULATOR_API_KEY_VAR};
use crate::errors::PlaygroundError;

pub mod gemini;

pub use gemini::GeminiClient;

/// An ordered, finite, append-only sequence of predicted text fragments.
/// Concatenating the fragments in arrival order yields the full prediction.
pub type TextChunkStream = Pin<Box<dyn Stream<Item = Result<String, PlaygroundError>> + Send>>;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate the full completion for a prompt in one call.
    async fn complete(&self, prompt: &str) -> Result<String, PlaygroundError>;

    /// Generate a completion as a stream of chunks. The stream terminates
    /// when the underlying generation call completes; it is not restartable.
    async fn complete_stream(&self, prompt: &str) -> Result<TextChunkStream, PlaygroundError>;
}

/// Create the configured text generator. Fails with a configuration error
/// when no API key is available.
pub fn create_generator(config: &SimulatorConfig) -> Result<Arc<dyn TextGenerator>, PlaygroundError> {
    let api_key = config
        .api_key
        .clone()
        .or_else(|| env::var(SIMULATOR_API_KEY_VAR).ok())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            PlaygroundError::Configuration(format!(
                "No API key found for the simulator. Set {} or simulator.api_key",
                SIMULATOR_API_KEY_VAR
            ))
        })?;

    let client = match &config.api_base {
        Some(base) => GeminiClient::with_base_url(api_key, config.model.clone(), base.clone()),
        None => GeminiClient::new(api_key, config.model.clone()),
    };

    Ok(Arc::new(client))
}
