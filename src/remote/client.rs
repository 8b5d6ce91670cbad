//! HTTP transport for the repair management backend.
//!
//! # Security Note - Logging
//!
//! The session token travels in the `X-Auth-Token` header. It is wrapped in
//! `RedactedHeader` and marked sensitive on the `HeaderValue`, so neither our
//! own debug output nor reqwest's request logging prints it.
//!
//! Every call is a single attempt with the configured timeout. There is no
//! retry and no queueing; callers see exactly one outcome per request.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::HeaderValue;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{BachesError, Result};

use super::token::TokenProvider;

pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Wrapper for the session token that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    fn as_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.value).map_err(|_| {
            BachesError::Config(
                "stored token contains characters that are not allowed in a header".to_string(),
            )
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Shared request plumbing: base origin, timeout and auth header.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
    tokens: Arc<dyn TokenProvider>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// The configured timeout bounds the whole request, connect included.
    pub fn new(config: &Config, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let base_url = config.base_url()?;
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| BachesError::Other(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout,
            tokens,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BachesError::Config(format!("cannot build URL for '{path}': {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let mut builder = self.client.request(method, self.url(path)?);
        // Read per request so a replaced token applies to the next call
        if let Some(token) = self.tokens.token() {
            let header = RedactedHeader::new(token.expose_secret());
            builder = builder.header(AUTH_HEADER, header.as_header_value()?);
        }
        Ok(builder)
    }

    /// Send once and turn any non-2xx answer into a typed failure.
    async fn execute(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response> {
        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(&method, path, e))?;
        let status = response.status();

        tracing::debug!(
            method = %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "repair service request"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }

    fn transport_error(&self, method: &Method, path: &str, error: reqwest::Error) -> BachesError {
        tracing::warn!(method = %method, path, error = %error, "repair service unreachable");
        if error.is_timeout() {
            BachesError::Network(format!(
                "{method} {path} timed out after {} ms",
                self.timeout.as_millis()
            ))
        } else if error.is_connect() {
            BachesError::Network(format!("cannot connect to {}", self.base_url))
        } else {
            BachesError::Network(error.to_string())
        }
    }

    /// GET a JSON document.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path)?;
        let response = self.execute(Method::GET, path, builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&Method::GET, path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            BachesError::Other(format!("unexpected response from {path}: {e}"))
        })
    }

    /// POST a JSON body and return the plain-text confirmation.
    pub async fn post_json_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let builder = self.request(Method::POST, path)?.json(body);
        let response = self.execute(Method::POST, path, builder).await?;
        response
            .text()
            .await
            .map_err(|e| self.transport_error(&Method::POST, path, e))
    }

    /// DELETE and return the plain-text confirmation.
    pub async fn delete_text(&self, path: &str) -> Result<String> {
        let builder = self.request(Method::DELETE, path)?;
        let response = self.execute(Method::DELETE, path, builder).await?;
        response
            .text()
            .await
            .map_err(|e| self.transport_error(&Method::DELETE, path, e))
    }
}

/// Map an error status onto the closed failure taxonomy.
pub fn status_error(status: StatusCode, body: String) -> BachesError {
    match status.as_u16() {
        404 => BachesError::NotFound(body),
        400 | 409 | 422 => BachesError::Validation(body),
        code => BachesError::Http { status: code, body },
    }
}
