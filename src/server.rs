//! Axum integration for the server context.
//!
//! ARCHITECTURE
//! ============
//! `ServerAuth` is extracted once per request. It seeds a cookie store from
//! the incoming `Cookie` header, builds an `AuthClient` with its own session
//! container, and records redirects instead of performing them. Handlers pass
//! their response through [`ServerAuth::finish`], which swaps in a pending
//! 302 (carrying over the handler's own cookies) and forwards every
//! `Set-Cookie` the backend returned during the request.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{HOST, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::Response;

use crate::client::AuthClient;
use crate::config::AuthConfig;
use crate::context::RequestContext;
use crate::cookies::MemoryCookieStore;
use crate::http::HttpTransport;
use crate::redirect::ServerNavigator;

/// Shared, per-application pieces every request's client is built from.
#[derive(Clone)]
pub struct AuthSettings {
    pub config: Arc<AuthConfig>,
    pub transport: Arc<dyn HttpTransport>,
}

impl AuthSettings {
    #[must_use]
    pub fn new(config: AuthConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config: Arc::new(config), transport }
    }
}

/// Auth context for one incoming request.
pub struct ServerAuth {
    client: AuthClient,
    cookies: Arc<MemoryCookieStore>,
    navigator: Arc<ServerNavigator>,
}

impl ServerAuth {
    #[must_use]
    pub fn from_parts(parts: &Parts, settings: &AuthSettings) -> Self {
        let cookies = Arc::new(MemoryCookieStore::from_headers(&parts.headers));
        let navigator = Arc::new(ServerNavigator::new());
        let client = AuthClient::new(
            settings.config.clone(),
            RequestContext::server(request_url(parts)),
            settings.transport.clone(),
            cookies.clone(),
            navigator.clone(),
        );
        Self { client, cookies, navigator }
    }

    #[must_use]
    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    /// Pending redirect target, if an action navigated.
    #[must_use]
    pub fn redirect_location(&self) -> Option<String> {
        self.navigator.location()
    }

    /// Apply the pending redirect and forwarded cookies to `response`. A
    /// redirect replaces the handler's response but keeps its `Set-Cookie`
    /// headers.
    #[must_use]
    pub fn finish(&self, response: Response) -> Response {
        let mut response = match self.navigator.take_response() {
            Some(mut redirect) => {
                for value in response.headers().get_all(SET_COOKIE) {
                    redirect.headers_mut().append(SET_COOKIE, value.clone());
                }
                redirect
            }
            None => response,
        };
        for raw in self.cookies.take_set_cookies() {
            match HeaderValue::from_str(&raw) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => tracing::warn!(error = %e, "dropping unforwardable set-cookie value"),
            }
        }
        response
    }
}

impl<S> FromRequestParts<S> for ServerAuth
where
    AuthSettings: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let settings = AuthSettings::from_ref(state);
        Ok(Self::from_parts(parts, &settings))
    }
}

/// Best-effort absolute URL of the request. Falls back to the path when no
/// host is known.
fn request_url(parts: &Parts) -> String {
    if parts.uri.scheme().is_some() && parts.uri.authority().is_some() {
        return parts.uri.to_string();
    }
    let path = parts
        .uri
        .path_and_query()
        .map_or("/", |path_and_query| path_and_query.as_str());
    let Some(host) = parts.headers.get(HOST).and_then(|value| value.to_str().ok()) else {
        return path.to_owned();
    };
    let scheme = parts
        .headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    format!("{scheme}://{host}{path}")
}

#[cfg(test)]
#[path = "server_test.rs"]
mod tests;
