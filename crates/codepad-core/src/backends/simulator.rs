//! Predicted execution output via text generation
//!
//! When real execution is unavailable, the playground asks a text generator
//! to predict what the program would print. The prediction is advisory, a
//! best-effort approximation, and is never treated as ground truth. Batch
//! and streaming modes send the identical instruction.

use std::sync::Arc;

use crate::core_types::LanguageId;
use crate::errors::PlaygroundError;
use crate::textgen::{TextChunkStream, TextGenerator};

pub struct PredictiveOutputSimulator {
    generator: Arc<dyn TextGenerator>,
}

impl PredictiveOutputSimulator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn build_prompt(source: &str, language: LanguageId) -> String {
        format!(
            "You are a code execution simulator. You will be given a block of code in a specific language.\n\
             Your task is to predict the exact output that would be printed to the terminal if this code were executed.\n\
             Do not provide any explanation, comments, or markdown formatting. Only return the raw text output that the code would generate.\n\
             \n\
             Language: {}\n\
             Code:\n\
             ```\n\
             {}\n\
             ```\n",
            language, source
        )
    }

    /// Predict the full output as one completed string.
    pub async fn predict(&self, source: &str, language: LanguageId) -> Result<String, PlaygroundError> {
        let prompt = Self::build_prompt(source, language);
        self.generator.complete(&prompt).await
    }

    /// Predict the output as an ordered stream of chunks. The consumer
    /// concatenates chunks in arrival order; the stream ends when the
    /// generation call completes.
    pub async fn predict_stream(
        &self,
        source: &str,
        language: LanguageId,
    ) -> Result<TextChunkStream, PlaygroundError> {
        let prompt = Self::build_prompt(source, language);
        self.generator.complete_stream(&prompt).await
    }
}
