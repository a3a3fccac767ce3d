//! Persona types
//!
//! `PersonaKey` is the closed set of selectable personas. Its kebab-case id
//! is the form used on the command line and in the config file.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selectable persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonaKey {
    TravelGuide,
    Chef,
    Assistant,
}

impl PersonaKey {
    /// All personas in display order. The first one is the default selection.
    pub const ALL: [PersonaKey; 3] = [Self::TravelGuide, Self::Chef, Self::Assistant];

    /// Stable kebab-case id
    pub fn id(self) -> &'static str {
        match self {
            Self::TravelGuide => "travel-guide",
            Self::Chef => "chef",
            Self::Assistant => "assistant",
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Self::TravelGuide => "Travel Guide",
            Self::Chef => "Chef",
            Self::Assistant => "Helpful Assistant",
        }
    }

    /// One-line summary shown in persona listings
    pub fn description(self) -> &'static str {
        match self {
            Self::TravelGuide => "Destinations, sightseeing spots and trip planning",
            Self::Chef => "Recipes, cooking methods, ingredients and kitchen tips",
            Self::Assistant => "General questions, answered politely",
        }
    }
}

impl fmt::Display for PersonaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PersonaKey {
    type Err = Error;

    /// Accepts the id, the label or the variant name, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = name_to_id(&split_camel_case(s));
        Self::ALL
            .into_iter()
            .find(|key| key.id() == wanted || name_to_id(key.label()) == wanted)
            .ok_or_else(|| Error::UnknownPersona(s.trim().to_string()))
    }
}

/// A persona as shown to the user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub key: PersonaKey,
    pub label: &'static str,
    pub description: &'static str,
    pub system_prompt: &'static str,
}

/// Convert a name to a kebab-case ID
pub fn name_to_id(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// "TravelGuide" -> "Travel Guide"
fn split_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = c.is_lowercase();
        out.push(c);
    }
    out
}
