use async_trait::async_trait;

use crate::core::errors::KbError;

/// Embedding capability: one text in, one fixed-dimension vector out.
///
/// Truncation to the provider's input budget is the caller's job; this
/// adapter sends whatever it is given.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, KbError>;
}

/// Completion capability: fixed system instruction plus one user turn.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, KbError>;
}
