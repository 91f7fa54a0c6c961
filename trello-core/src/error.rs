// Error handling for the Trello workflow crate

use thiserror::Error;

/// Type alias for Trello results
pub type TrelloResult<T> = Result<T, TrelloError>;

/// Errors surfaced by the HTTP client, configuration store, and workflow
/// runner. Every variant is fatal to the current run: nothing in this
/// crate retries or recovers.
#[derive(Debug, Error)]
pub enum TrelloError {
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        retryable: bool,
        timeout: bool,
    },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing configuration key: {key}")]
    MissingKey { key: String },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Workflow error: {message}")]
    Workflow { message: String },
}

impl TrelloError {
    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
            retryable: true,
            timeout: true,
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
            retryable: true,
            timeout: false,
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
            retryable: true,
            timeout: false,
        }
    }

    /// Create an API error from a non-success status
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error for a JSON body lacking an expected field
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::Decode {
            message: format!("response body lacks expected field `{}`", field.into()),
            source: None,
        }
    }

    /// Create an error for an absent configuration key
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Create a configuration file error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a workflow sequencing error
    pub fn workflow(message: impl Into<String>) -> Self {
        Self::Workflow {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TrelloError::Network { timeout: true, .. })
    }

    /// Advisory only; nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            TrelloError::Network { retryable, .. } => *retryable,
            TrelloError::Api { status, .. } => (500..600).contains(status) || *status == 429,
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TrelloError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
