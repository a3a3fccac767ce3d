//! expertchat - Ask a hosted LLM questions through an expert persona
//!
//! The user types a question and picks a persona (travel guide, chef, or a
//! plain helpful assistant). The persona's system prompt and the question
//! are sent as one two-message chat request to an OpenAI-compatible
//! completion endpoint, and the reply is printed as-is.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              Terminal front-end              │
//! │   question ──┐           ┌── persona select  │
//! └──────────────┼───────────┼───────────────────┘
//!                ▼           ▼
//! ┌──────────────────────────────────────────────┐
//! │             Response Generator               │
//! │  system = registry.lookup(persona)           │
//! │  user   = question (verbatim)                │
//! └──────────────────────┬───────────────────────┘
//!                        │ ChatRequest
//! ┌──────────────────────▼───────────────────────┐
//! │      CompletionProvider (OpenAI / stub)      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! One question is one outbound call. There is no conversation history,
//! no streaming and no retry.
//!
//! ## Modules
//!
//! - [`personas`]: Closed persona set and its system prompts
//! - [`chat`]: Chat request types and completion providers
//! - [`generator`]: Persona + question to reply
//! - [`frontend`]: Session state, rendering and the interactive REPL
//! - [`config`]: Configuration and credential resolution

pub mod chat;
pub mod config;
pub mod error;
pub mod frontend;
pub mod generator;
pub mod personas;

pub use config::AppConfig;
pub use error::{Error, ProviderError, Result};
pub use generator::ResponseGenerator;
pub use personas::{PersonaKey, PersonaRegistry};
