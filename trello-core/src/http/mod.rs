// Minimal HTTP client for the Trello REST API

use crate::auth::Credentials;
use crate::error::{TrelloError, TrelloResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

pub use self::config::HttpConfig;
pub use self::pacing::{FixedIntervalPacer, NoopPacer, Pacer};

mod config;
mod pacing;

/// HTTP methods used against the Trello REST API
#[derive(Debug, Clone, Copy)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// HTTP client for Trello REST API operations.
///
/// Credentials are appended to every request as the `key`/`token` query
/// parameters, and the injected [`Pacer`] is awaited before every
/// dispatch to stay under the remote rate limiter.
pub struct TrelloHttpClient {
    client: Client,
    credentials: Option<Credentials>,
    base_url: String,
    pacer: Arc<dyn Pacer>,
}

impl TrelloHttpClient {
    /// Create a new HTTP client without credentials or pacing.
    pub fn new(config: HttpConfig) -> TrelloResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|e| TrelloError::Config {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            credentials: None,
            base_url: config.base_url.clone(),
            pacer: Arc::new(NoopPacer),
        })
    }

    /// Create a new HTTP client with credentials.
    pub fn with_credentials(config: HttpConfig, credentials: Credentials) -> TrelloResult<Self> {
        let mut client = Self::new(config)?;
        client.credentials = Some(credentials);
        Ok(client)
    }

    /// Inject the pacer awaited before every request.
    pub fn set_pacer(&mut self, pacer: Arc<dyn Pacer>) {
        self.pacer = pacer;
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a GET request builder
    pub fn get(&self, path: &str) -> HttpRequestBuilder {
        HttpRequestBuilder::new(self, HttpMethod::Get, &self.full_url(path))
    }

    /// Create a POST request builder
    pub fn post(&self, path: &str) -> HttpRequestBuilder {
        HttpRequestBuilder::new(self, HttpMethod::Post, &self.full_url(path))
    }

    /// Create a PUT request builder
    pub fn put(&self, path: &str) -> HttpRequestBuilder {
        HttpRequestBuilder::new(self, HttpMethod::Put, &self.full_url(path))
    }

    /// Create a DELETE request builder
    pub fn delete(&self, path: &str) -> HttpRequestBuilder {
        HttpRequestBuilder::new(self, HttpMethod::Delete, &self.full_url(path))
    }

    fn full_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }
}

/// HTTP request builder for fluent API
pub struct HttpRequestBuilder<'a> {
    client: &'a TrelloHttpClient,
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    query_params: Vec<(String, String)>,
    error: Option<TrelloError>,
}

impl<'a> HttpRequestBuilder<'a> {
    fn new(client: &'a TrelloHttpClient, method: HttpMethod, url: &str) -> Self {
        Self {
            client,
            method,
            url: url.to_string(),
            headers: Vec::new(),
            query_params: Vec::new(),
            error: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Add query parameters from any serializable form.
    ///
    /// A serialization failure is held in the builder and surfaced by
    /// `send`/`send_json`; the request is never dispatched with a
    /// partial parameter set.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Self {
        if self.error.is_some() {
            return self;
        }
        // round-trip through the form codec so `+`/`%XX` escapes map
        // back to the original values; reqwest re-encodes on dispatch
        let pairs = serde_urlencoded::to_string(params)
            .map_err(|e| TrelloError::Decode {
                message: format!("Failed to serialize query parameters: {}", e),
                source: Some(Box::new(e)),
            })
            .and_then(|serialized| {
                serde_urlencoded::from_str::<Vec<(String, String)>>(&serialized).map_err(|e| {
                    TrelloError::Decode {
                        message: format!("Failed to decode query parameters: {}", e),
                        source: Some(Box::new(e)),
                    }
                })
            });
        match pairs {
            Ok(pairs) => self.query_params.extend(pairs),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Add a single query parameter
    pub fn query_param(mut self, key: &str, value: &str) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    async fn dispatch(self) -> TrelloResult<Response> {
        if let Some(error) = self.error {
            return Err(error);
        }

        // Throttle before touching the wire.
        self.client.pacer.pause().await;

        let mut request = match self.method {
            HttpMethod::Get => self.client.client.get(&self.url),
            HttpMethod::Post => self.client.client.post(&self.url),
            HttpMethod::Put => self.client.client.put(&self.url),
            HttpMethod::Delete => self.client.client.delete(&self.url),
        };

        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        if !self.query_params.is_empty() {
            request = request.query(&self.query_params);
        }

        // Trello authenticates via query parameters, not headers.
        if let Some(credentials) = self.client.credentials() {
            request = request.query(&credentials.query_params());
        }

        debug!(method = ?self.method, url = %self.url, "sending request");

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                TrelloError::timeout(format!("Request timeout: {}", e))
            } else if e.is_connect() {
                TrelloError::connection_failed(format!("Connection failed: {}", e))
            } else {
                TrelloError::network(format!("Network error: {}", e))
            }
        })
    }

    /// Send the request and get the raw response
    pub async fn send(self) -> TrelloResult<HttpResponse> {
        let response = self.dispatch().await?;
        Ok(HttpResponse { inner: response })
    }

    /// Send the request, require a success status, and parse the body as JSON
    pub async fn send_json<T: DeserializeOwned>(self) -> TrelloResult<T> {
        let response = self.dispatch().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TrelloError::api(status.as_u16(), error_text));
        }

        response.json::<T>().await.map_err(|e| TrelloError::Decode {
            message: format!("Failed to parse response: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Send the request and require a success status, ignoring the body
    pub async fn send_expect_success(self) -> TrelloResult<()> {
        let response = self.dispatch().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TrelloError::api(status.as_u16(), error_text));
        }
        Ok(())
    }
}

/// HTTP response wrapper
#[derive(Debug)]
pub struct HttpResponse {
    inner: Response,
}

impl HttpResponse {
    /// Get response status code
    pub fn status(&self) -> reqwest::StatusCode {
        self.inner.status()
    }

    /// Parse response as JSON
    pub async fn json<T: DeserializeOwned>(self) -> TrelloResult<T> {
        self.inner.json().await.map_err(|e| TrelloError::Decode {
            message: format!("Failed to parse JSON: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Get response as text
    pub async fn text(self) -> TrelloResult<String> {
        self.inner
            .text()
            .await
            .map_err(|e| TrelloError::network(format!("Failed to read response: {}", e)))
    }
}
