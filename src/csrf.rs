//! CSRF token acquisition.
//!
//! The backend sets the CSRF cookie as a side effect of the token call; we
//! never set it ourselves. The presence check always re-reads the cookie
//! store after the fetch instead of reusing a value read before it.

use serde_json::Value;

use crate::client::AuthClient;
use crate::error::AuthError;

impl AuthClient {
    /// Fetch a CSRF token from the `csrf` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingEndpoint`] if no `csrf` endpoint is
    /// configured, transport/status errors from the call, or
    /// [`AuthError::Parse`] if the body has no `csrfToken` string.
    pub async fn get_csrf_token(&self) -> Result<String, AuthError> {
        let endpoint = self
            .config()
            .endpoints
            .csrf
            .clone()
            .ok_or(AuthError::MissingEndpoint("csrf"))?;
        let body = self.send_json(self.request_for(&endpoint)).await?;
        body.get("csrfToken")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| AuthError::Parse("csrf response has no `csrfToken` string".to_owned()))
    }

    /// Make sure the CSRF cookie is set before a mutating request.
    ///
    /// Without a `csrf` endpoint the backend does not use CSRF cookies and
    /// this is a no-op. Otherwise a missing cookie triggers one token fetch.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CsrfAcquisition`] if the cookie is still absent
    /// after the fetch.
    pub async fn ensure_csrf(&self) -> Result<(), AuthError> {
        if self.config().endpoints.csrf.is_none() || self.csrf_cookie().is_some() {
            return Ok(());
        }

        if let Err(e) = self.get_csrf_token().await {
            tracing::warn!(error = %e, "csrf token fetch failed");
        }

        if self.csrf_cookie().is_some() {
            Ok(())
        } else {
            let cookie = self.config().csrf.cookie_name.clone();
            tracing::error!(%cookie, "csrf cookie still missing after token fetch");
            Err(AuthError::CsrfAcquisition { cookie })
        }
    }

    /// Current CSRF cookie value, read fresh from the store.
    #[must_use]
    pub fn csrf_cookie(&self) -> Option<String> {
        self.cookies().get(&self.config().csrf.cookie_name)
    }
}

#[cfg(test)]
#[path = "csrf_test.rs"]
mod tests;
