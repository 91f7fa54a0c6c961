// Authentication for the Trello REST API

use crate::config::ConfigStore;
use crate::error::TrelloResult;

/// Trello API credentials.
///
/// Trello authenticates every request through the `key` and `token`
/// query parameters rather than an Authorization header; the HTTP
/// client appends both to each outgoing request.
#[derive(Debug, Clone)]
pub struct Credentials {
    key: String,
    token: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
        }
    }

    /// Read `APIKey` / `APIToken` from a configuration store.
    pub fn from_config(config: &ConfigStore) -> TrelloResult<Self> {
        Ok(Self::new(config.get("APIKey")?, config.get("APIToken")?))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// The two query parameters attached to every request.
    pub fn query_params(&self) -> [(&'static str, &str); 2] {
        [("key", &self.key), ("token", &self.token)]
    }
}
