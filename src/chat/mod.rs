//! Chat completion plumbing
//!
//! Message types, the injectable provider interface, and the OpenAI
//! implementation of it.

mod openai;
mod provider;
mod types;

#[cfg(test)]
pub(crate) mod stub;

pub use openai::OpenAiProvider;
pub use provider::CompletionProvider;
pub use types::{ChatMessage, ChatRequest, Role};
