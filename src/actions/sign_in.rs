use serde_json::Value;

use super::{Credentials, GetSessionOptions, SignInOptions};
use crate::client::AuthClient;
use crate::error::AuthError;

impl AuthClient {
    /// Sign in with `credentials`.
    ///
    /// Returns `Ok(None)` after a redirect or when the backend answers with
    /// something other than a JSON object, and the raw response body when
    /// `options.redirect` is false.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingEndpoint`] without a `sign_in` endpoint,
    /// [`AuthError::CsrfAcquisition`] if no CSRF cookie can be obtained, and
    /// transport/status errors from the sign-in request.
    pub async fn sign_in(&self, credentials: Credentials, options: SignInOptions) -> Result<Option<Value>, AuthError> {
        let endpoint = self
            .config()
            .endpoints
            .sign_in
            .clone()
            .ok_or(AuthError::MissingEndpoint("sign_in"))?;
        self.ensure_csrf().await?;

        let mut body = credentials;
        body.extend(options.extra);

        let mut request = self.mutating_request_for(&endpoint);
        request.query = options.query;
        request.headers.extend(options.headers);
        request.body = Some(Value::Object(body));

        let response = self.send_json(request).await?;
        if !response.is_object() {
            tracing::error!(response = %response, "sign-in response is not a JSON object");
            return Ok(None);
        }

        if options.call_get_session {
            // Let pending state updates settle before the session refresh.
            tokio::task::yield_now().await;
            self.get_session(GetSessionOptions::default()).await?;
        }

        if options.redirect {
            let target = self.callback_url(options.callback_url.as_deref(), false);
            self.navigate(&target).await?;
            return Ok(None);
        }

        Ok(Some(response))
    }
}

#[cfg(test)]
#[path = "sign_in_test.rs"]
mod tests;
