//! Response generator
//!
//! Turns (user text, persona) into one chat request, sends it through the
//! injected provider and hands back the reply untouched.

use crate::chat::{ChatRequest, CompletionProvider};
use crate::error::ProviderError;
use crate::personas::{PersonaKey, PersonaRegistry};
use std::sync::Arc;

/// Asks the completion provider one question at a time
#[derive(Clone)]
pub struct ResponseGenerator {
    provider: Arc<dyn CompletionProvider>,
    registry: PersonaRegistry,
}

impl ResponseGenerator {
    /// Create a generator around a provider
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            registry: PersonaRegistry,
        }
    }

    /// Persona registry used for system prompts
    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    /// Build the two-message request for a question
    pub fn build_request(&self, user_text: &str, persona: PersonaKey) -> ChatRequest {
        ChatRequest::new(self.registry.lookup(persona), user_text)
    }

    /// Ask the provider; exactly one outbound call.
    pub async fn generate(
        &self,
        user_text: &str,
        persona: PersonaKey,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(user_text, persona);

        tracing::debug!(
            "Asking {} as {} ({} chars)",
            self.provider.name(),
            persona.id(),
            user_text.chars().count()
        );

        match self.provider.complete(&request).await {
            Ok(reply) => {
                tracing::debug!("Received {} chars from {}", reply.chars().count(), self.provider.name());
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!("Completion via {} failed: {}", self.provider.name(), e);
                Err(e)
            }
        }
    }

    /// Like `generate`, but empty input is answered with `None` and never
    /// reaches the provider. Whitespace is a question like any other.
    pub async fn respond(
        &self,
        user_text: &str,
        persona: PersonaKey,
    ) -> Result<Option<String>, ProviderError> {
        if user_text.is_empty() {
            return Ok(None);
        }
        self.generate(user_text, persona).await.map(Some)
    }
}
