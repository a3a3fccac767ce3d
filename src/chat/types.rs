//! Chat message types

use serde::{Deserialize, Serialize};

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One question: the persona's system message followed by the user's text.
///
/// Built fresh for every call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    messages: [ChatMessage; 2],
}

impl ChatRequest {
    /// Both contents are taken verbatim.
    pub fn new(system_prompt: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            messages: [ChatMessage::system(system_prompt), ChatMessage::user(user_text)],
        }
    }

    /// Messages in send order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    pub fn user_text(&self) -> &str {
        &self.messages[1].content
    }
}
