//! HTTP transport used by the auth actions.
//!
//! `HttpTransport` is the seam; `ReqwestTransport` is the real client. Bodies
//! are JSON. The transport never follows cookies on its own: the caller adds
//! the `Cookie` header and applies the returned `Set-Cookie` values.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::SET_COOKIE;
use serde_json::Value;
use url::Url;

use crate::error::AuthError;
use crate::resolve::is_external_url;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// One outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL or a path relative to the app origin.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), query: Vec::new(), body: None }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header named `name`, case-insensitive.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A completed response with its body read as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub set_cookies: Vec<String>,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self { status, set_cookies: Vec::new(), body: body.to_string() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON. An empty body reads as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Parse`] if the body is not valid JSON.
    pub fn body_json(&self) -> Result<Value, AuthError> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(|e| AuthError::Parse(e.to_string()))
    }
}

/// Sends auth requests. Enables mocking in tests.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request and read the full response.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] if the request cannot be sent or the
    /// body cannot be read. Non-2xx statuses are not errors at this level.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthError>;
}

/// `reqwest`-backed transport. Relative URLs are resolved against `origin`.
pub struct ReqwestTransport {
    http: reqwest::Client,
    origin: Option<Url>,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if `origin` is not a valid URL and
    /// [`AuthError::Transport`] if the client cannot be built.
    pub fn new(origin: Option<&str>) -> Result<Self, AuthError> {
        let origin = origin
            .map(|raw| Url::parse(raw).map_err(|e| AuthError::Config(format!("invalid origin {raw:?}: {e}"))))
            .transpose()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(Self { http, origin })
    }

    fn absolute_url(&self, url: &str) -> Result<Url, AuthError> {
        if is_external_url(url) {
            return Url::parse(url).map_err(|e| AuthError::Transport(format!("invalid url {url:?}: {e}")));
        }
        let origin = self
            .origin
            .as_ref()
            .ok_or_else(|| AuthError::Transport(format!("relative url {url:?} needs an origin")))?;
        origin
            .join(url)
            .map_err(|e| AuthError::Transport(format!("invalid url {url:?}: {e}")))
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthError> {
        let url = self.absolute_url(&request.url)?;
        let mut builder = self.http.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_owned)
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, set_cookies, body })
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
