//! Per-render-cycle state of the terminal surface
//!
//! A `Session` remembers the selected persona and what the output region
//! currently shows. Nothing else survives between questions.

use crate::generator::ResponseGenerator;
use crate::personas::PersonaKey;
use std::io::{self, Write};

/// What the output region shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No question asked yet, or the last input was empty
    Idle,
    /// The model's reply, verbatim
    Answer(String),
    /// The provider call failed; shown in place of an answer
    Failed(String),
}

/// Current persona selection plus the last outcome
pub struct Session {
    generator: ResponseGenerator,
    persona: PersonaKey,
    outcome: Outcome,
}

impl Session {
    pub fn new(generator: ResponseGenerator, persona: PersonaKey) -> Self {
        Self {
            generator,
            persona,
            outcome: Outcome::Idle,
        }
    }

    pub fn persona(&self) -> PersonaKey {
        self.persona
    }

    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    /// Switch persona for the next question
    pub fn select(&mut self, persona: PersonaKey) {
        if persona != self.persona {
            tracing::info!("Persona switched: {} -> {}", self.persona.id(), persona.id());
            self.persona = persona;
        }
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Ask a question under the current persona and record the outcome.
    ///
    /// The previous outcome is always replaced, so a failure never leaves
    /// an older answer on screen.
    pub async fn submit(&mut self, text: &str) -> &Outcome {
        self.outcome = match self.generator.respond(text, self.persona).await {
            Ok(Some(reply)) => Outcome::Answer(reply),
            Ok(None) => Outcome::Idle,
            Err(e) => Outcome::Failed(e.to_string()),
        };
        &self.outcome
    }
}

/// Write an outcome to the output region
pub fn render<W: Write>(outcome: &Outcome, out: &mut W) -> io::Result<()> {
    match outcome {
        Outcome::Idle => Ok(()),
        Outcome::Answer(reply) => {
            writeln!(out, "### Answer:")?;
            writeln!(out)?;
            writeln!(out, "{}", reply)
        }
        Outcome::Failed(cause) => writeln!(out, "Error: {}", cause),
    }
}
