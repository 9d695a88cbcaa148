//! Notes-to-cards generation.
//!
//! Provides the [`CardGenerator`] trait and an implementation that talks to an
//! OpenAI-compatible chat completions API. The generator returns raw JSON
//! entries; checking their shape is the job of
//! [`validate_batch`](crate::cards::validate::validate_batch).

pub mod openai;
pub mod prompt;

use async_trait::async_trait;

use crate::error::Result;

/// Turns free-text notes into candidate flashcard objects.
#[async_trait]
pub trait CardGenerator: Send + Sync {
    /// Returns the entries of the JSON array the model produced, unvalidated.
    async fn generate(&self, notes: &str) -> Result<Vec<serde_json::Value>>;
}

/// Create the configured generator.
pub fn create_generator(
    config: &crate::config::GenerationConfig,
) -> anyhow::Result<Box<dyn CardGenerator>> {
    let generator = openai::OpenAiGenerator::new(config)?;
    Ok(Box::new(generator))
}
