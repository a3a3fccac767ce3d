//! Completion provider interface
//!
//! The one outbound capability the generator depends on. The production
//! implementation is `OpenAiProvider`; tests substitute recording stubs.

use crate::chat::types::ChatRequest;
use crate::error::ProviderError;
use async_trait::async_trait;

/// Hosted chat-completion service.
///
/// Implementations must be thread-safe (`Send + Sync`). One call to
/// `complete` is one outbound request; implementations do not retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the request and return the top completion's text verbatim.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError>;

    /// Human-readable name for this provider (used in logs).
    fn name(&self) -> &str;
}
