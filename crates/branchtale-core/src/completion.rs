//! Text completion abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// Port to the external language-model completion service.
///
/// Implementations send a single user-role prompt and return the model's
/// reply text. Failures are reported as `DomainError::Upstream`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete `prompt` and return the raw reply text.
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;
}
