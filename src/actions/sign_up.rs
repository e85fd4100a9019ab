use serde_json::Value;

use super::{Credentials, SignUpOptions};
use crate::client::AuthClient;
use crate::error::AuthError;

impl AuthClient {
    /// Register a new account, then sign in with the same credentials unless
    /// `options.prevent_login_flow` is set.
    ///
    /// Without a `sign_up` endpoint this logs a warning and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CsrfAcquisition`], transport/status errors from
    /// the sign-up request, and any error from the chained sign-in.
    pub async fn sign_up(&self, credentials: Credentials, options: SignUpOptions) -> Result<Option<Value>, AuthError> {
        let Some(endpoint) = self.config().endpoints.sign_up.clone() else {
            tracing::warn!("sign_up endpoint is not configured");
            return Ok(None);
        };
        self.ensure_csrf().await?;

        let mut request = self.mutating_request_for(&endpoint);
        request.body = Some(Value::Object(credentials.clone()));
        let response = self.send_json(request).await?;

        if options.prevent_login_flow {
            return Ok(Some(response));
        }

        self.sign_in(credentials, options.sign_in).await
    }
}

#[cfg(test)]
#[path = "sign_up_test.rs"]
mod tests;
