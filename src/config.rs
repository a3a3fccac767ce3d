//! expertchat configuration management
//!
//! Configuration comes from an optional TOML file (`~/.expertchat/config.toml`
//! unless `--config` names another). The API key is resolved separately so it
//! never has to live in the config file:
//!
//! 1. `provider.api_key` in the config file
//! 2. the environment variable named by `provider.api_key_env`
//! 3. a top-level entry of the same name in the secrets file
//!    (`.expertchat/secrets.toml` in the working directory by default)

use crate::error::{Error, Result};
use crate::personas::{PersonaKey, PersonaRegistry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main expertchat configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Completion provider configuration
    pub provider: ProviderConfig,

    /// Terminal front-end configuration
    pub ui: UiConfig,
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Name of the environment variable / secrets entry holding the API key
    pub api_key_env: String,

    /// Inline API key (prefer the environment or the secrets file)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature (provider default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Completion length cap (provider default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            timeout_secs: 60,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Terminal front-end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Persona selected when the REPL starts
    pub default_persona: PersonaKey,

    /// Keep line-editing history in `~/.expertchat/history`
    pub save_history: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_persona: PersonaRegistry.default_key(),
            save_history: true,
        }
    }
}

impl AppConfig {
    /// Load and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Load the given file, else the default file if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = config_path();
        if default_path.exists() {
            tracing::debug!("Loading configuration from {}", default_path.display());
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Copy safe to print: inline API key masked
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        config.provider.api_key = config.provider.api_key.as_deref().map(mask_api_key);
        config
    }
}

impl ProviderConfig {
    /// Resolve the API key from config, environment, then secrets file.
    ///
    /// A missing or blank key is a configuration error.
    pub fn resolve_api_key(&self, secrets_path: &Path) -> Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok(), secrets_path)
    }

    fn resolve_api_key_with<F>(&self, env: F, secrets_path: &Path) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let names = [self.api_key_env.clone(), self.api_key_env.to_uppercase()];

        let from_config = self.api_key.clone();
        let from_env = || names.iter().find_map(|name| non_blank(env(name)));

        if let Some(key) = non_blank(from_config).or_else(from_env) {
            return Ok(key);
        }

        if let Some(key) = read_secret(secrets_path, &names)? {
            tracing::debug!("API key loaded from {}", secrets_path.display());
            return Ok(key);
        }

        Err(Error::Config(format!(
            "No API key found: set {} in the environment or in {}",
            self.api_key_env,
            secrets_path.display()
        )))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Look up a string entry in the secrets file. A missing file is not an error.
fn read_secret(path: &Path, names: &[String]) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    let table: toml::Table = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    Ok(names.iter().find_map(|name| {
        let value = table.get(name)?.as_str()?.to_string();
        non_blank(Some(value))
    }))
}

/// Mask an API key for display: show first 8 + last 4 chars
pub fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

/// Per-user directory (~/.expertchat/)
pub fn default_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".expertchat")
}

/// Default config file path
pub fn config_path() -> PathBuf {
    default_dir().join("config.toml")
}

/// REPL line-editing history path
pub fn history_path() -> PathBuf {
    default_dir().join("history")
}

/// Default secrets file, relative to the working directory
pub fn default_secrets_path() -> PathBuf {
    PathBuf::from(".expertchat").join("secrets.toml")
}
