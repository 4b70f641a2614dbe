//! Generative-language API contract.

use async_trait::async_trait;

use crate::error::Result;

/// Thin client for a text-in/text-out generative model.
///
/// The converter and the chat assistant both go through this single
/// operation; prompt construction stays with the callers.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Sends one prompt and returns the model's text reply.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
