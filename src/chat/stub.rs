//! Recording stub provider for tests

use crate::chat::provider::CompletionProvider;
use crate::chat::types::ChatRequest;
use crate::error::ProviderError;
use async_trait::async_trait;
use std::sync::Mutex;

/// Returns a canned reply (or failure) and records every request it sees.
pub(crate) struct StubProvider {
    reply: Result<String, String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl StubProvider {
    pub(crate) fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call like a refused connection
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(ProviderError::with_source(
                message.clone(),
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            )),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}
