//! `AuthClient`: the injected context every auth action runs against.
//!
//! SYSTEM CONTEXT
//! ==============
//! One client is built per incoming request on the server and once per page
//! session in the browser. It owns the session container and carries every
//! collaborator explicitly (config, current request, transport, cookie
//! store, navigator), so nothing is looked up from ambient globals and
//! server requests can never share session state.

use std::sync::Arc;

use serde_json::Value;

use crate::config::{AuthConfig, Endpoint};
use crate::context::RequestContext;
use crate::cookies::CookieStore;
use crate::error::AuthError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::redirect::Navigator;
use crate::resolve::{is_off_origin, query_param, resolve_api_url_path};
use crate::session::{AuthStatus, SessionState};

/// Query parameter carrying the page to return to after auth.
pub const REDIRECT_QUERY_PARAM: &str = "redirect";

#[derive(Clone)]
pub struct AuthClient {
    config: Arc<AuthConfig>,
    request: RequestContext,
    transport: Arc<dyn HttpTransport>,
    cookies: Arc<dyn CookieStore>,
    navigator: Arc<dyn Navigator>,
    session: SessionState,
}

impl AuthClient {
    #[must_use]
    pub fn new(
        config: Arc<AuthConfig>,
        request: RequestContext,
        transport: Arc<dyn HttpTransport>,
        cookies: Arc<dyn CookieStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { config, request, transport, cookies, navigator, session: SessionState::new() }
    }

    /// Reuse an existing container, e.g. the browser's page-session singleton.
    #[must_use]
    pub fn with_session(mut self, session: SessionState) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.session.status()
    }

    #[must_use]
    pub fn data(&self) -> Option<Value> {
        self.session.data()
    }

    /// True if the session cookie is present in the cookie store.
    #[must_use]
    pub fn has_session_cookie(&self) -> bool {
        self.cookies.get(&self.config.cookie.name).is_some()
    }

    pub(crate) fn cookies(&self) -> &dyn CookieStore {
        self.cookies.as_ref()
    }

    /// Request skeleton for an endpoint. Server-side calls forward the cookie
    /// store as a `Cookie` header.
    pub(crate) fn request_for(&self, endpoint: &Endpoint) -> HttpRequest {
        let url = resolve_api_url_path(&endpoint.path, &self.config, self.request.side());
        let mut request = HttpRequest::new(endpoint.method.as_method(), url).header("Accept", "application/json");
        if self.request.is_server() {
            if let Some(cookie_header) = self.cookies.header() {
                request = request.header("Cookie", cookie_header);
            }
        }
        request
    }

    /// Like [`Self::request_for`], plus the CSRF header when the cookie is set.
    pub(crate) fn mutating_request_for(&self, endpoint: &Endpoint) -> HttpRequest {
        let request = self.request_for(endpoint);
        match self.csrf_cookie() {
            Some(token) => request.header(self.config.csrf.header_name.clone(), token),
            None => request,
        }
    }

    /// Send a request, apply its `Set-Cookie` headers, and return the raw response.
    pub(crate) async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthError> {
        tracing::debug!(method = %request.method, url = %request.url, "auth request");
        let response = self.transport.send(request).await?;
        for raw in &response.set_cookies {
            self.cookies.apply_set_cookie(raw);
        }
        Ok(response)
    }

    /// Send a request and parse a successful JSON body.
    pub(crate) async fn send_json(&self, request: HttpRequest) -> Result<Value, AuthError> {
        let url = request.url.clone();
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(AuthError::Status { status: response.status, url, body: response.body });
        }
        response.body_json()
    }

    /// Where to go after sign-in/sign-out: explicit target, then the
    /// `redirect` query parameter, then the current URL. Sign-out may use the
    /// configured sign-out target before falling back to the current URL.
    /// Blank candidates are skipped.
    pub(crate) fn callback_url(&self, explicit: Option<&str>, is_sign_out: bool) -> String {
        if let Some(url) = explicit.filter(|url| !is_blank(url)) {
            return url.to_owned();
        }
        if let Some(url) = query_param(self.request.url(), REDIRECT_QUERY_PARAM).filter(|url| !is_blank(url)) {
            return url;
        }
        if is_sign_out {
            if let Some(url) = self.config.redirect.sign_out.as_deref().filter(|url| !is_blank(url)) {
                return url.to_owned();
            }
        }
        self.request.url().to_owned()
    }

    /// Navigate, treating off-origin targets as external.
    pub(crate) async fn navigate(&self, url: &str) -> Result<(), AuthError> {
        let external = is_off_origin(url, self.request.url());
        tracing::debug!(%url, external, "auth redirect");
        self.navigator.navigate(url, external).await
    }
}

pub(crate) fn is_blank(url: &str) -> bool {
    url.trim().is_empty()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
