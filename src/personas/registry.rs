//! Builtin persona registry
//!
//! The registry is a fixed table keyed by `PersonaKey`. Every key has an
//! entry because the lookup is an exhaustive `match`, so there is no
//! runtime validation at the lookup boundary.

use crate::personas::types::{Persona, PersonaKey};

const TRAVEL_GUIDE_PROMPT: &str = "You are an experienced travel guide. Answer questions about travel kindly and politely. Provide the information travelers want to know, such as details about destinations, recommended sightseeing spots, and how to plan a trip.";

const CHEF_PROMPT: &str = "You are a first-class chef. Answer questions about cooking with professional knowledge and passion. Share information that helps people who cook, such as recipes, cooking methods, how to choose ingredients, and cooking tips.";

const ASSISTANT_PROMPT: &str = "You are a kind assistant. Answer questions politely.";

/// Read-only persona registry
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonaRegistry;

impl PersonaRegistry {
    /// System prompt for a persona, returned verbatim
    pub fn lookup(&self, key: PersonaKey) -> &'static str {
        match key {
            PersonaKey::TravelGuide => TRAVEL_GUIDE_PROMPT,
            PersonaKey::Chef => CHEF_PROMPT,
            PersonaKey::Assistant => ASSISTANT_PROMPT,
        }
    }

    /// Full persona entry
    pub fn get(&self, key: PersonaKey) -> Persona {
        Persona {
            key,
            label: key.label(),
            description: key.description(),
            system_prompt: self.lookup(key),
        }
    }

    /// All personas in display order
    pub fn list(&self) -> Vec<Persona> {
        PersonaKey::ALL.into_iter().map(|key| self.get(key)).collect()
    }

    /// Default selection: the first persona
    pub fn default_key(&self) -> PersonaKey {
        PersonaKey::ALL[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_has_a_prompt() {
        let registry = PersonaRegistry;
        for key in PersonaKey::ALL {
            assert!(!registry.lookup(key).is_empty(), "{} has an empty prompt", key.id());
        }
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let registry = PersonaRegistry;
        for key in PersonaKey::ALL {
            let first = registry.lookup(key);
            for _ in 0..3 {
                assert_eq!(registry.lookup(key), first);
            }
        }
    }

    #[test]
    fn test_prompts_are_distinct() {
        let registry = PersonaRegistry;
        assert_ne!(
            registry.lookup(PersonaKey::TravelGuide),
            registry.lookup(PersonaKey::Chef)
        );
        assert_ne!(
            registry.lookup(PersonaKey::Chef),
            registry.lookup(PersonaKey::Assistant)
        );
    }

    #[test]
    fn test_list_follows_display_order() {
        let registry = PersonaRegistry;
        let personas = registry.list();
        assert_eq!(personas.len(), PersonaKey::ALL.len());
        assert_eq!(personas[0].key, PersonaKey::TravelGuide);
        assert_eq!(personas[1].label, "Chef");
        assert_eq!(personas[2].system_prompt, ASSISTANT_PROMPT);
        assert_eq!(registry.default_key(), PersonaKey::TravelGuide);
    }

    #[test]
    fn test_persona_serialization() {
        let persona = PersonaRegistry.get(PersonaKey::Chef);
        let json = serde_json::to_string(&persona).unwrap();
        assert!(json.contains("\"key\":\"chef\""));
        assert!(json.contains("\"systemPrompt\""));
    }
}
