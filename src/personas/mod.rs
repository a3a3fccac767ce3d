//! Personas module — the behavioural framings a question can be asked under
//!
//! Each persona maps to one fixed system prompt. The set is closed; every
//! selector in the CLI is generated from `PersonaKey::ALL`.

pub mod registry;
pub mod types;

pub use registry::PersonaRegistry;
pub use types::{name_to_id, Persona, PersonaKey};
