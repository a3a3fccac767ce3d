//! expertchat error types

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// expertchat error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing credential, bad config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion provider error
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Persona name not in the registry
    #[error("Unknown persona '{0}' (try `expertchat personas`)")]
    UnknownPersona(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Terminal line-editor error
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Failure of a single outbound completion call.
///
/// Network, authentication, provider-side and timeout failures all collapse
/// into this one kind; the cause is kept as the message and, when there is
/// one, as the error source.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl ProviderError {
    /// Create a provider error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a provider error wrapping its underlying cause
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable cause
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("could not connect to provider: {}", err)
        } else if err.is_decode() {
            format!("could not decode provider response: {}", err)
        } else {
            format!("request failed: {}", err)
        };
        Self::with_source(message, err)
    }
}

/// Result type alias for expertchat operations
pub type Result<T> = std::result::Result<T, Error>;
